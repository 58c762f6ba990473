//! Common test utilities for fpga-crihook integration tests
//!
//! [`TestHost`] builds a fake FPGA host in a temp directory: a sysfs tree, a
//! bitstream repository, a container bundle and shell-script stand-ins for
//! the vendor tools.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub const ANNOTATION: &str = r#""com.intel.fpga.mode": "fpga.intel.com/region""#;

/// A fake FPGA host for running the real hook binary
pub struct TestHost {
    pub temp: TempDir,
    pub root: PathBuf,
}

impl TestHost {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { temp, root }
    }

    pub fn bitstream_dir(&self) -> PathBuf {
        self.root.join("fpga")
    }

    pub fn bundle_dir(&self) -> PathBuf {
        self.root.join("bundle")
    }

    pub fn tool(&self, name: &str) -> PathBuf {
        self.root.join("tools").join(name)
    }

    /// Log file a tool script appends its arguments to
    pub fn tool_log(&self, name: &str) -> PathBuf {
        self.root.join("tools").join(format!("{name}.log"))
    }

    pub fn afu_id_path(&self, device: u32) -> PathBuf {
        self.root
            .join("sys")
            .join(format!("intel-fpga-dev.{device}"))
            .join(format!("intel-fpga-port.{device}"))
            .join("afu_id")
    }

    pub fn interface_id_path(&self, device: u32) -> PathBuf {
        self.root
            .join("sys")
            .join(format!("intel-fpga-dev.{device}"))
            .join(format!("intel-fpga-fme.{device}"))
            .join("pr")
            .join("interface_id")
    }

    pub fn set_afu_id(&self, device: u32, value: &str) {
        write_file(&self.afu_id_path(device), &format!("{value}\n"));
    }

    pub fn set_interface_id(&self, device: u32, value: &str) {
        write_file(&self.interface_id_path(device), &format!("{value}\n"));
    }

    pub fn read_afu_id(&self, device: u32) -> String {
        std::fs::read_to_string(self.afu_id_path(device))
            .expect("Failed to read afu_id")
            .trim()
            .to_string()
    }

    /// Create a bitstream file in the repository
    pub fn add_bitstream(&self, region: &str, afu: &str, ext: &str) -> PathBuf {
        let path = self.bitstream_dir().join(region).join(format!("{afu}{ext}"));
        write_file(&path, "bitstream");
        path
    }

    /// Write the bundle config.json
    pub fn write_bundle(&self, env: &[&str], devices: &[&str]) {
        let devices: Vec<_> = devices
            .iter()
            .map(|path| serde_json::json!({"path": path, "type": "c", "major": 246}))
            .collect();
        let config = serde_json::json!({
            "ociVersion": "1.0.2",
            "process": {"env": env, "cwd": "/"},
            "linux": {"devices": devices},
        });
        write_file(&self.bundle_dir().join("config.json"), &config.to_string());
    }

    /// Container state JSON as the runtime passes it on stdin
    pub fn state(&self, annotations: &str) -> String {
        format!(
            r#"{{"ociVersion": "1.0.2", "id": "c1", "status": "creating", "pid": 4242,
                "bundle": "{}", "annotations": {{{annotations}}}}}"#,
            self.bundle_dir().display()
        )
    }

    /// Install a tool script that logs its args and runs `body`
    pub fn install_tool(&self, name: &str, body: &str) {
        let path = self.tool(name);
        let script = format!(
            "#!/bin/sh\necho \"$@\" >> '{}'\n{body}\n",
            self.tool_log(name).display()
        );
        write_file(&path, &script);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make tool executable");
    }

    /// packager stand-in that prints `info` for `gbs-info`
    pub fn install_packager(&self, info: &str) {
        self.install_tool("packager", &format!("cat <<'EOF'\n{info}\nEOF"));
    }

    /// Programming tool stand-in that sets device `device` to `afu`
    pub fn install_programmer(&self, name: &str, device: u32, afu: &str) {
        self.install_tool(
            name,
            &format!("echo '{afu}' > '{}'", self.afu_id_path(device).display()),
        );
    }

    pub fn tool_calls(&self, name: &str) -> Vec<String> {
        std::fs::read_to_string(self.tool_log(name))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// The hook binary pointed at this host
    #[allow(deprecated)]
    pub fn hook_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("fpga-crihook").expect("hook binary is built");
        let sys = self.root.join("sys");
        cmd.arg("--bitstream-dir")
            .arg(self.bitstream_dir())
            .arg("--packager")
            .arg(self.tool("packager"))
            .arg("--fpgaconf")
            .arg(self.tool("fpgaconf"))
            .arg("--aocl")
            .arg(self.tool("aocl"))
            .arg("--afu-id-template")
            .arg(format!(
                "{}/intel-fpga-dev.{{dev}}/intel-fpga-port.{{dev}}/afu_id",
                sys.display()
            ))
            .arg("--interface-id-template")
            .arg(format!(
                "{}/intel-fpga-dev.{{dev}}/intel-fpga-fme.{{dev}}/pr/interface_id",
                sys.display()
            ));
        cmd
    }
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

/// gbs-info output for a region and AFU
pub fn gbs_info(interface_uuid: &str, accelerator_type_uuid: &str) -> String {
    format!(
        r#"{{
    "version": 1,
    "afu-image": {{
        "magic-no": 488605312,
        "interface-uuid": "{interface_uuid}",
        "power": 0,
        "accelerator-clusters": [
            {{
                "total-contexts": 1,
                "name": "nlb_400",
                "accelerator-type-uuid": "{accelerator_type_uuid}"
            }}
        ]
    }},
    "platform-name": "DCP"
}}"#
    )
}
