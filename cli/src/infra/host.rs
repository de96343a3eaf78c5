//! Infrastructure implementation of the `LocalHost` port.

use crate::application::ports::LocalHost;

/// Reads the local machine name the way the update agent reports it.
///
/// `COMPUTERNAME` is the NetBIOS name on Windows; elsewhere the OS host name
/// is used.
pub struct SystemHost;

impl LocalHost for SystemHost {
    fn machine_name(&self) -> String {
        std::env::var("COMPUTERNAME")
            .ok()
            .filter(|name| !name.is_empty())
            .or_else(sysinfo::System::host_name)
            .unwrap_or_else(|| "localhost".to_string())
    }
}
