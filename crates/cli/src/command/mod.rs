mod config;
mod ensure;
mod go;
mod init;
mod packages;
mod release;
mod status;

pub use config::{run_config_get, run_config_set};
pub use ensure::{run_ensure, EnsureOptions};
pub use go::{run_go, GoAction};
pub use init::run_init;
pub use packages::{run_add, run_rm, run_update, UpdateOptions};
pub use release::run_release;
pub use status::run_status;

use gop_vendor::{SyncAction, SyncReport};

/// Print one line per dependency that changed or needs attention
pub(crate) fn print_report(report: &SyncReport, report_unresolved: bool) {
    for entry in &report.entries {
        match entry.action {
            SyncAction::Copied => println!("Copying {}", entry.unit),
            SyncAction::Updated => println!("Updating {}", entry.unit),
            SyncAction::WouldCopy => println!("Dry copying {}", entry.unit),
            SyncAction::Unresolved if report_unresolved => println!(
                "Package {} not found on $GOPATH, please use --get or go get at first",
                entry.package
            ),
            _ => log::debug!("{}: {:?}", entry.package, entry.action),
        }
    }
}
