//! FPGA port device nodes

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static PORT_DEVICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/dev/intel-fpga-port\.(\d+)$").expect("port device pattern is valid")
});

/// Device numbers of the FPGA ports among `paths`
///
/// Paths that are not FPGA port nodes are ignored.
pub fn port_numbers<S: AsRef<str>>(paths: &[S]) -> BTreeSet<u32> {
    paths
        .iter()
        .filter_map(|path| {
            PORT_DEVICE
                .captures(path.as_ref())
                .and_then(|caps| caps.get(1))
                .and_then(|num| num.as_str().parse().ok())
        })
        .collect()
}
