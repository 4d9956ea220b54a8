//! Fixed filesystem layout and unit name for the minion daemon.
//!
//! Every path is expressed relative to a caller-supplied root so tests can
//! run against a `TempDir`; the binary passes `/`.

use std::path::{Path, PathBuf};

/// Name of the daemon's systemd unit.
pub const MINION_UNIT: &str = "salt-minion";

/// Group id applied by the ownership pass (the platform's `users` group).
pub const SALT_GID: u32 = 100;

/// `<root>/etc/salt/minion` — the generated configuration file.
pub fn config_file(root: &Path) -> PathBuf {
    root.join("etc").join("salt").join("minion")
}

/// `<root>/opt/vyatta/etc/config/salt/pki/minion` — key material directory.
pub fn pki_dir(root: &Path) -> PathBuf {
    root.join("opt")
        .join("vyatta")
        .join("etc")
        .join("config")
        .join("salt")
        .join("pki")
        .join("minion")
}

/// `<pki_dir>/master_sign.pub` — the master's public signing key.
pub fn master_sign_key(root: &Path) -> PathBuf {
    pki_dir(root).join("master_sign.pub")
}

/// The three roots whose ownership is normalized after generate.
pub fn ownership_roots(root: &Path) -> [PathBuf; 3] {
    [
        root.join("etc").join("salt"),
        root.join("var").join("run").join("salt"),
        root.join("opt")
            .join("vyatta")
            .join("etc")
            .join("config")
            .join("salt"),
    ]
}
