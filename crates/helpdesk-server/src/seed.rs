//! Demo cases loaded into an empty store at startup.

use helpdesk_core::{Result, case::SupportCase, service::CaseService, store::SupportStore};

/// `(owner, complete, description)` for "Support Case 1" through "Support Case 12".
const DEMO_CASES: [(&str, bool, &str); 12] = [
  ("Shehab Fawzy", true, "Outlook keeps prompting for credentials after the password rotation."),
  ("Devidas Gupta", false, "Nightly backup job for the finance share fails with a timeout."),
  ("Nick Hauenstein", false, "Conference room display no longer detects laptops over HDMI."),
  ("Tim Colbert", false, "Reporting database queries slowed down after the index rebuild."),
  ("Anne Hamilton", false, "New starter needs a laptop and a directory account."),
  ("Shehab Fawzy", true, "VPN client drops the connection every few minutes on hotel Wi-Fi."),
  ("Nick Hauenstein", true, "Shared mailbox permissions missing for the support team."),
  ("Devidas Gupta", false, "File server running out of disk space on the archive volume."),
  ("Tim Colbert", true, "Multi-factor enrolment link expired before first sign-in."),
  ("Tim Colbert", false, "Mobile devices are not syncing calendar changes."),
  ("Anne Hamilton", false, "Print queue on the third floor is stuck on a single job."),
  ("Shehab Fawzy", true, "Cloud storage quota alerts firing for an unused tenant."),
];

/// Create the demo cases if the case collection is empty. Returns how many
/// were created.
pub async fn seed_demo_cases<S: SupportStore>(cases: &CaseService<S>) -> Result<usize> {
  if cases.count_cases().await? > 0 {
    return Ok(0);
  }

  for (i, (owner, complete, description)) in DEMO_CASES.into_iter().enumerate() {
    cases
      .create_case(SupportCase {
        title: Some(format!("Support Case {}", i + 1)),
        owner: Some(owner.to_owned()),
        description: Some(description.to_owned()),
        is_complete: complete,
        ..Default::default()
      })
      .await?;
  }
  tracing::info!(count = DEMO_CASES.len(), "seeded demo support cases");
  Ok(DEMO_CASES.len())
}
