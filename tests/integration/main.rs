//! Integration tests for minikube-cache

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Temp home, store and config wired together
    struct Sandbox {
        dir: TempDir,
    }

    impl Sandbox {
        fn new(minikube_binary: &str) -> Self {
            let dir = TempDir::new().unwrap();
            let config = format!(
                "[minikube]\nbinary = {:?}\nhome = {:?}\n\n[store]\ndir = {:?}\n",
                minikube_binary,
                dir.path().join("home"),
                dir.path().join("store"),
            );
            fs::write(dir.path().join("config.toml"), config).unwrap();
            Self { dir }
        }

        fn path(&self, rel: &str) -> PathBuf {
            self.dir.path().join(rel)
        }

        fn cache_dir(&self, artifact: &str) -> PathBuf {
            self.path("home/.minikube/cache").join(artifact)
        }

        fn cmd(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("minikube-cache");
            cmd.arg("--config")
                .arg(self.path("config.toml"))
                .env("RUNNER_TEMP", self.dir.path())
                .env_remove("MINIKUBE_CACHE_STATE")
                .env_remove("MINIKUBE_CACHE_CONFIG")
                .env_remove("RUST_LOG")
                .env_remove("INPUT_CACHE")
                .env_remove("INPUT_KUBERNETES-VERSION")
                .env_remove("INPUT_CONTAINER-RUNTIME");
            cmd
        }

        fn cached_cmd(&self) -> Command {
            let mut cmd = self.cmd();
            cmd.env("INPUT_CACHE", "true");
            cmd
        }

        fn hit_state(&self) -> serde_json::Value {
            let content = fs::read_to_string(self.path("minikube-cache-hits.json")).unwrap();
            serde_json::from_str(&content).unwrap()
        }
    }

    const MISSING_MINIKUBE: &str = "/nonexistent/minikube-cache-test/minikube";

    #[cfg(unix)]
    fn fake_minikube(dir: &Path, version: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-minikube");
        fs::write(&path, format!("#!/bin/sh\necho {}\n", version)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("minikube-cache")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Minikube artifact caching"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("minikube-cache")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("minikube-cache"));
    }

    #[test]
    fn restore_disabled_writes_all_hit_state() {
        let sandbox = Sandbox::new(MISSING_MINIKUBE);

        sandbox
            .cmd()
            .arg("restore")
            .assert()
            .success()
            .stdout(predicate::str::contains("Caching disabled"));

        assert_eq!(
            sandbox.hit_state(),
            serde_json::json!({"iso": true, "kic": true, "preload": true, "images": true})
        );
    }

    #[test]
    fn restore_fails_without_minikube() {
        let sandbox = Sandbox::new(MISSING_MINIKUBE);

        sandbox
            .cached_cmd()
            .arg("restore")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Command failed"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn post_never_fails() {
        let sandbox = Sandbox::new(MISSING_MINIKUBE);
        fs::create_dir_all(sandbox.cache_dir("images")).unwrap();

        sandbox.cached_cmd().arg("post").assert().success();
    }

    #[test]
    fn save_without_state_succeeds() {
        let sandbox = Sandbox::new(MISSING_MINIKUBE);

        sandbox.cached_cmd().arg("save").assert().success();
        assert!(!sandbox.path("store").exists());
    }

    #[test]
    fn keys_plain_output() {
        let sandbox = Sandbox::new(MISSING_MINIKUBE);

        sandbox
            .cmd()
            .env("INPUT_CONTAINER-RUNTIME", "containerd")
            .args(["keys", "--minikube-version", "v1.32.0", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("iso-v1.32.0-"))
            .stdout(predicate::str::contains("-stable-containerd"));
    }

    #[test]
    fn config_path() {
        let sandbox = Sandbox::new(MISSING_MINIKUBE);

        sandbox
            .cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let sandbox = Sandbox::new(MISSING_MINIKUBE);

        sandbox
            .cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[minikube]"));
    }

    #[cfg(unix)]
    #[test]
    fn restore_save_restore_roundtrip() {
        let scripts = TempDir::new().unwrap();
        let minikube = fake_minikube(scripts.path(), "v1.32.0");
        let first = Sandbox::new(&minikube);

        first
            .cached_cmd()
            .arg("restore")
            .assert()
            .success()
            .stdout(predicate::str::contains("4 of 4 caches missed"));
        assert_eq!(first.hit_state()["iso"], false);
        assert_eq!(first.hit_state()["images"], false);

        // minikube start populates two of the four directories
        fs::create_dir_all(first.cache_dir("iso/amd64")).unwrap();
        fs::write(first.cache_dir("iso/amd64/minikube-v1.32.0-amd64.iso"), "iso").unwrap();
        fs::create_dir_all(first.cache_dir("images")).unwrap();
        fs::write(first.cache_dir("images/pause"), "pause").unwrap();

        first
            .cached_cmd()
            .arg("save")
            .assert()
            .success()
            .stdout(predicate::str::contains("saved as iso-v1.32.0-"));

        // A second job on the same runner shares the store
        let second = Sandbox::new(&minikube);
        let shared_store = format!(
            "[minikube]\nbinary = {:?}\nhome = {:?}\n\n[store]\ndir = {:?}\n",
            minikube,
            second.path("home"),
            first.path("store"),
        );
        fs::write(second.path("config.toml"), shared_store).unwrap();

        second.cached_cmd().arg("restore").assert().success();

        let state = second.hit_state();
        assert_eq!(state["iso"], true);
        assert_eq!(state["images"], true);
        assert_eq!(state["kic"], false);
        assert_eq!(state["preload"], false);
        assert_eq!(
            fs::read_to_string(second.cache_dir("images/pause")).unwrap(),
            "pause"
        );
    }

    #[cfg(unix)]
    #[test]
    fn run_skips_save_when_command_fails() {
        let scripts = TempDir::new().unwrap();
        let minikube = fake_minikube(scripts.path(), "v1.32.0");
        let sandbox = Sandbox::new(&minikube);
        fs::create_dir_all(sandbox.cache_dir("kic")).unwrap();

        sandbox
            .cached_cmd()
            .args(["run", "--", "sh", "-c", "exit 3"])
            .assert()
            .code(3);

        assert!(!sandbox.path("store").exists());
    }
}
