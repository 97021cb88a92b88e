use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[allow(deprecated)]
fn gop(dir: &Path, gopath: &Path, config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gop").expect("binary");
    cmd.current_dir(dir)
        .env("GOPATH", gopath)
        .env("GOP_GO", "/nonexistent/gop-tests/go")
        .env("GOP_CONFIG", config)
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn init_scaffolds_a_named_project() {
    let tmp = tempdir().unwrap();
    let gopath = tmp.path().join("gopath");
    let config = tmp.path().join("config.toml");

    gop(tmp.path(), &gopath, &config)
        .args(["init", "blog"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Initialized project blog"));

    let root = tmp.path().join("blog");
    assert!(root.join("gop.toml").is_file());
    assert!(root.join("bin").is_dir());
    assert!(root.join("src/vendor").is_dir());
    assert!(root.join("src/main/main.go").is_file());

    // A fresh project has nothing to vendor.
    gop(&root.join("src/main"), &gopath, &config)
        .arg("status")
        .assert()
        .success()
        .stdout("");
}

#[test]
fn init_in_current_directory_keeps_existing_main() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("site");
    fs::create_dir_all(root.join("src/main")).unwrap();
    fs::write(root.join("src/main/main.go"), "package main\n\nimport \"os\"\n").unwrap();

    gop(&root, tmp.path(), &tmp.path().join("c.toml"))
        .arg("init")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(root.join("src/main/main.go")).unwrap(),
        "package main\n\nimport \"os\"\n"
    );
    assert!(fs::read_to_string(root.join("gop.toml"))
        .unwrap()
        .contains("name = \"site\""));
}

#[test]
fn commands_outside_a_project_fail() {
    let tmp = tempdir().unwrap();
    gop(tmp.path(), tmp.path(), &tmp.path().join("c.toml"))
        .arg("ensure")
        .assert()
        .failure()
        .stderr(predicates::str::contains("is not inside a gop project"));
}

#[test]
fn config_set_then_get() {
    let tmp = tempdir().unwrap();
    let config = tmp.path().join("gop/config.toml");

    gop(tmp.path(), tmp.path(), &config)
        .args(["config", "set", "init.default_editor", "vim"])
        .assert()
        .success();
    assert!(config.is_file());

    gop(tmp.path(), tmp.path(), &config)
        .args(["config", "get", "init.default_editor"])
        .assert()
        .success()
        .stdout("vim\n");

    gop(tmp.path(), tmp.path(), &config)
        .args(["config", "get", "--all"])
        .assert()
        .success()
        .stdout(predicates::str::contains("init.default_editor = vim"))
        .stdout(predicates::str::contains(
            "sources.github.url_prefix = https://github.com",
        ));
}

#[test]
fn config_rejects_unknown_keys() {
    let tmp = tempdir().unwrap();
    let config = tmp.path().join("config.toml");

    gop(tmp.path(), tmp.path(), &config)
        .args(["config", "set", "editor", "vim"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("unknown config key"));
    assert!(!config.exists());

    gop(tmp.path(), tmp.path(), &config)
        .args(["config", "get", "sources.gitlab.url_prefix"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("is not set"));
}

#[cfg(unix)]
mod go_tool {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    /// A go binary that records its arguments, GOPATH and working directory
    fn fake_go(dir: &Path, exit_code: i32) -> (PathBuf, PathBuf) {
        let log = dir.join("go.log");
        let script = dir.join("fake-go.sh");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\n\
                 echo \"args: $*\" >> \"{log}\"\n\
                 echo \"gopath: $GOPATH\" >> \"{log}\"\n\
                 echo \"modules: $GO111MODULE\" >> \"{log}\"\n\
                 echo \"pwd: $(pwd)\" >> \"{log}\"\n\
                 exit {exit_code}\n",
                log = log.display()
            ),
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        (script, log)
    }

    fn project(tmp: &Path) -> PathBuf {
        let root = tmp.join("app");
        fs::create_dir_all(root.join("src/main")).unwrap();
        fs::create_dir_all(root.join("src/tool")).unwrap();
        fs::write(root.join("src/main/main.go"), "package main\n").unwrap();
        fs::write(
            root.join("gop.toml"),
            "name = \"app\"\n\n[[targets]]\nname = \"server\"\ndir = \"main\"\n",
        )
        .unwrap();
        root
    }

    #[test]
    fn build_writes_binary_into_bin() {
        let tmp = tempdir().unwrap();
        let root = project(tmp.path());
        let (go, log) = fake_go(tmp.path(), 0);

        gop(&root, &tmp.path().join("gopath"), &tmp.path().join("c.toml"))
            .env("GOP_GO", &go)
            .env_remove("GOOS")
            .args(["build", "--", "-v"])
            .assert()
            .success();

        let log = fs::read_to_string(log).unwrap();
        let bin = root.join("bin/server");
        assert!(log.contains(&format!("args: build -v -o {}", bin.display())), "{log}");
        assert!(log.contains(&format!("gopath: {}", root.display())), "{log}");
        assert!(log.contains("modules: off"), "{log}");
        assert!(log.contains("/src/main\n"), "{log}");
        assert!(root.join("bin").is_dir());
    }

    #[test]
    fn test_and_vet_run_in_selected_target() {
        let tmp = tempdir().unwrap();
        let root = project(tmp.path());
        let (go, log) = fake_go(tmp.path(), 0);

        for command in ["test", "vet"] {
            gop(&root, &tmp.path().join("gopath"), &tmp.path().join("c.toml"))
                .env("GOP_GO", &go)
                .args([command, "tool"])
                .assert()
                .success();
        }

        let log = fs::read_to_string(log).unwrap();
        assert!(log.contains("args: test\n"), "{log}");
        assert!(log.contains("args: vet\n"), "{log}");
        assert_eq!(log.matches("/src/tool\n").count(), 2, "{log}");
    }

    #[test]
    fn failing_go_tool_fails_the_command() {
        let tmp = tempdir().unwrap();
        let root = project(tmp.path());
        let (go, _log) = fake_go(tmp.path(), 3);

        gop(&root, &tmp.path().join("gopath"), &tmp.path().join("c.toml"))
            .env("GOP_GO", &go)
            .arg("build")
            .assert()
            .failure()
            .stderr(predicates::str::contains("build"));
    }

    #[test]
    fn release_builds_then_copies_assets() {
        let tmp = tempdir().unwrap();
        let root = project(tmp.path());
        let (go, log) = fake_go(tmp.path(), 0);
        fs::write(
            root.join("gop.toml"),
            "name = \"app\"\n\n[[targets]]\nname = \"server\"\ndir = \"main\"\n\
             assets = [\"templates\", \"config.ini\", \"missing\"]\n",
        )
        .unwrap();
        fs::create_dir_all(root.join("src/templates/partials")).unwrap();
        fs::write(root.join("src/templates/index.html"), "<h1>hi</h1>").unwrap();
        fs::write(root.join("src/templates/partials/nav.html"), "<nav/>").unwrap();
        fs::write(root.join("src/config.ini"), "port = 80\n").unwrap();
        fs::create_dir_all(root.join("bin/templates")).unwrap();
        fs::write(root.join("bin/templates/old.html"), "stale").unwrap();

        gop(&root, &tmp.path().join("gopath"), &tmp.path().join("c.toml"))
            .env("GOP_GO", &go)
            .env_remove("GOOS")
            .arg("release")
            .assert()
            .success()
            .stdout(predicates::str::contains("Copying asset templates"))
            .stdout(predicates::str::contains("Copying asset config.ini"));

        let log = fs::read_to_string(log).unwrap();
        let bin = root.join("bin");
        assert!(
            log.contains(&format!("args: build -o {}", bin.join("server").display())),
            "{log}"
        );
        assert_eq!(
            fs::read_to_string(bin.join("templates/index.html")).unwrap(),
            "<h1>hi</h1>"
        );
        assert!(bin.join("templates/partials/nav.html").is_file());
        assert!(!bin.join("templates/old.html").exists());
        assert_eq!(fs::read_to_string(bin.join("config.ini")).unwrap(), "port = 80\n");
        assert!(!bin.join("missing").exists());
    }

    #[test]
    fn release_rejects_assets_outside_src() {
        let tmp = tempdir().unwrap();
        let root = project(tmp.path());
        let (go, log) = fake_go(tmp.path(), 0);
        fs::write(
            root.join("gop.toml"),
            "name = \"app\"\n\n[[targets]]\nname = \"server\"\ndir = \"main\"\n\
             assets = [\"../outside\"]\n",
        )
        .unwrap();

        gop(&root, &tmp.path().join("gopath"), &tmp.path().join("c.toml"))
            .env("GOP_GO", &go)
            .arg("release")
            .assert()
            .failure()
            .stderr(predicates::str::contains("must be a relative path inside src/"));
        assert!(!log.exists());
    }
}
