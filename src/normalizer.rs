/// Architectures recognised as a trailing `.arch` suffix on package names.
pub const DEFAULT_ARCHITECTURES: &[&str] = &["x86_64", "i686", "noarch", "aarch64", "ppc64le", "s390x"];

/// Strip a trailing architecture suffix so the name can be looked up.
///
/// `boost-atomic.x86_64` becomes `boost-atomic`; `python3.11` is returned
/// as-is because `11` is not an architecture.
pub fn normalize_name<S: AsRef<str>>(raw: &str, architectures: &[S]) -> String {
    if let Some((name, arch)) = raw.rsplit_once('.') {
        if architectures.iter().any(|a| a.as_ref() == arch) {
            return name.to_string();
        }
    }
    raw.to_string()
}
