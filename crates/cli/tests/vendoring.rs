use assert_cmd::Command;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

struct Sandbox {
    _tmp: TempDir,
    project: PathBuf,
    gopath: PathBuf,
    config: PathBuf,
}

fn write(path: &Path, source: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, source).unwrap();
}

impl Sandbox {
    /// `app` imports tango, tango imports log; both live on GOPATH
    fn new(main_imports: &[&str]) -> Self {
        let tmp = tempdir().unwrap();
        let project = tmp.path().join("app");
        let gopath = tmp.path().join("gopath");
        let config = tmp.path().join("gop-global.toml");

        write(&project.join("gop.toml"), "name = \"app\"\n");
        let imports: String = main_imports
            .iter()
            .map(|i| format!("\t\"{i}\"\n"))
            .collect();
        write(
            &project.join("src/main/main.go"),
            &format!("package main\n\nimport (\n{imports})\n\nfunc main() {{}}\n"),
        );

        let src = gopath.join("src");
        write(
            &src.join("github.com/lunny/tango/tango.go"),
            "package tango\n\nimport (\n\t\"net/http\"\n\t\"github.com/lunny/log\"\n)\n",
        );
        write(
            &src.join("github.com/lunny/tango/tango_test.go"),
            "package tango\n\nimport \"testing\"\n",
        );
        write(
            &src.join("github.com/lunny/tango/middleware/mw.go"),
            "package middleware\n",
        );
        write(&src.join("github.com/lunny/tango/.git/HEAD"), "ref: refs/heads/master\n");
        write(
            &src.join("github.com/lunny/log/log.go"),
            "package log\n\nimport \"os\"\n",
        );

        Self {
            _tmp: tmp,
            project,
            gopath,
            config,
        }
    }

    fn standard() -> Self {
        Self::new(&["fmt", "github.com/lunny/tango"])
    }

    fn vendor(&self, name: &str) -> PathBuf {
        self.project.join("src/vendor").join(name)
    }

    #[allow(deprecated)]
    fn gop(&self) -> Command {
        let mut cmd = Command::cargo_bin("gop").expect("binary");
        cmd.current_dir(&self.project)
            .env("GOPATH", &self.gopath)
            .env("GOP_GO", "/nonexistent/gop-tests/go")
            .env("GOP_CONFIG", &self.config)
            .env_remove("GOOS")
            .env_remove("GOARCH")
            .env_remove("CGO_ENABLED")
            .env_remove("RUST_LOG");
        cmd
    }

    fn stdout(&self, args: &[&str]) -> String {
        let output = self.gop().args(args).output().expect("command run");
        assert!(
            output.status.success(),
            "gop {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }
}

#[test]
fn status_lists_unvendored_dependencies_in_walk_order() {
    let sandbox = Sandbox::standard();
    assert_eq!(
        sandbox.stdout(&["status"]),
        "[ ] github.com/lunny/tango\n[ ] github.com/lunny/log\n"
    );
}

#[test]
fn status_json_reports_kind_and_presence() {
    let sandbox = Sandbox::new(&["github.com/lunny/tango", "github.com/nobody/missing"]);
    let body: Value = serde_json::from_str(&sandbox.stdout(&["status", "--json"])).unwrap();
    let rows = body.as_array().unwrap();

    let names: Vec<&str> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec!["github.com/lunny/tango", "github.com/lunny/log", "github.com/nobody/missing"]
    );
    assert_eq!(rows[0]["kind"], "global_workspace");
    assert_eq!(rows[0]["present"], true);
    assert_eq!(rows[2]["present"], false);
    assert!(rows.iter().all(|r| r["vendored"] == false));
}

#[test]
fn ensure_copies_missing_repositories_once() {
    let sandbox = Sandbox::standard();

    assert_eq!(
        sandbox.stdout(&["ensure"]),
        "Copying github.com/lunny/tango\nCopying github.com/lunny/log\n"
    );
    let tango = sandbox.vendor("github.com/lunny/tango");
    assert!(tango.join("tango.go").is_file());
    assert!(tango.join("tango_test.go").is_file());
    assert!(tango.join("middleware/mw.go").is_file());
    assert!(!tango.join(".git").exists());

    assert_eq!(
        sandbox.stdout(&["status"]),
        "[X] github.com/lunny/tango\n[X] github.com/lunny/log\n"
    );
    assert_eq!(sandbox.stdout(&["ensure"]), "");
}

#[test]
fn ensure_without_tests_skips_test_files() {
    let sandbox = Sandbox::standard();
    sandbox.stdout(&["ensure", "--no-tests"]);
    let tango = sandbox.vendor("github.com/lunny/tango");
    assert!(tango.join("tango.go").is_file());
    assert!(!tango.join("tango_test.go").exists());
}

#[test]
fn ensure_dry_run_changes_nothing() {
    let sandbox = Sandbox::standard();
    assert_eq!(
        sandbox.stdout(&["ensure", "--dry"]),
        "Dry copying github.com/lunny/tango\nDry copying github.com/lunny/log\n"
    );
    assert!(!sandbox.vendor("github.com").exists());
}

#[test]
fn ensure_dry_run_cannot_be_combined_with_update() {
    let sandbox = Sandbox::standard();
    sandbox.stdout(&["ensure"]);

    sandbox
        .gop()
        .args(["ensure", "-d", "-u"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("cannot be used with"));
    assert!(sandbox.vendor("github.com/lunny/log/log.go").is_file());
}

#[test]
fn ensure_reports_packages_missing_from_gopath() {
    let sandbox = Sandbox::new(&["github.com/nobody/missing", "github.com/lunny/log"]);
    assert_eq!(
        sandbox.stdout(&["ensure"]),
        "Package github.com/nobody/missing not found on $GOPATH, please use --get or go get at first\n\
         Copying github.com/lunny/log\n"
    );
}

#[test]
fn ensure_update_refreshes_vendored_copies() {
    let sandbox = Sandbox::standard();
    sandbox.stdout(&["ensure"]);

    let upstream = sandbox.gopath.join("src/github.com/lunny/log/log.go");
    fs::write(&upstream, "package log\n\n// v2\n").unwrap();

    assert_eq!(
        sandbox.stdout(&["ensure", "--update"]),
        "Updating github.com/lunny/tango\nUpdating github.com/lunny/log\n"
    );
    assert_eq!(
        fs::read_to_string(sandbox.vendor("github.com/lunny/log/log.go")).unwrap(),
        "package log\n\n// v2\n"
    );
}

#[test]
fn add_vendors_repository_and_its_imports() {
    let sandbox = Sandbox::new(&["fmt"]);
    assert_eq!(
        sandbox.stdout(&["add", "github.com/lunny/tango/middleware"]),
        "Copying github.com/lunny/tango\nCopying github.com/lunny/log\n"
    );
    let tango = sandbox.vendor("github.com/lunny/tango");
    assert!(tango.join("middleware/mw.go").is_file());
    assert!(!tango.join("tango_test.go").exists());
    assert!(sandbox.vendor("github.com/lunny/log/log.go").is_file());

    // Already vendored: nothing to do without -u.
    assert_eq!(sandbox.stdout(&["add", "github.com/lunny/tango"]), "");
    assert_eq!(
        sandbox.stdout(&["add", "-u", "github.com/lunny/tango"]),
        "Copying github.com/lunny/tango\nUpdating github.com/lunny/log\n"
    );
}

#[test]
fn add_rejects_relative_and_unknown_packages() {
    let sandbox = Sandbox::standard();

    sandbox
        .gop()
        .args(["add", "./local"])
        .assert()
        .failure()
        .stderr(predicates::str::contains(
            "relative pkg and absolute pkg is not supported",
        ));

    sandbox
        .gop()
        .args(["add", "github.com/nobody/missing"])
        .assert()
        .failure()
        .stderr(predicates::str::contains(
            "Package github.com/nobody/missing not found on $GOPATH",
        ));
}

#[test]
fn update_copies_named_package_and_missing_dependencies() {
    let sandbox = Sandbox::standard();
    sandbox.stdout(&["ensure"]);
    fs::remove_dir_all(sandbox.vendor("github.com/lunny/log")).unwrap();
    fs::write(
        sandbox.gopath.join("src/github.com/lunny/tango/extra.go"),
        "package tango\n",
    )
    .unwrap();

    assert_eq!(
        sandbox.stdout(&["update", "github.com/lunny/tango"]),
        "Updating github.com/lunny/tango\nCopying github.com/lunny/log\n"
    );
    assert!(sandbox.vendor("github.com/lunny/tango/extra.go").is_file());
    assert!(!sandbox.vendor("github.com/lunny/tango/tango_test.go").exists());

    assert_eq!(
        sandbox.stdout(&["update", "--full", "--tests", "github.com/lunny/tango"]),
        "Updating github.com/lunny/tango\nUpdating github.com/lunny/log\n"
    );
    assert!(sandbox.vendor("github.com/lunny/tango/tango_test.go").is_file());
}

#[test]
fn rm_removes_the_repository_root() {
    let sandbox = Sandbox::standard();
    sandbox.stdout(&["ensure"]);

    assert_eq!(
        sandbox.stdout(&["rm", "github.com/lunny/tango/middleware"]),
        "removing github.com/lunny/tango\n"
    );
    assert!(!sandbox.vendor("github.com/lunny/tango").exists());
    assert!(sandbox.vendor("github.com/lunny/log").is_dir());

    // Removing something absent is not an error.
    assert_eq!(
        sandbox.stdout(&["rm", "github.com/lunny/tango"]),
        "removing github.com/lunny/tango\n"
    );
}

#[test]
fn unknown_target_is_an_error() {
    let sandbox = Sandbox::standard();
    sandbox
        .gop()
        .args(["status", "nope"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("unknown target"));
}

#[test]
fn gopath_is_required() {
    let sandbox = Sandbox::standard();
    sandbox
        .gop()
        .env_remove("GOPATH")
        .arg("status")
        .assert()
        .failure()
        .stderr(predicates::str::contains("GOPATH is not set"));
}

#[cfg(unix)]
#[test]
fn ensure_get_downloads_then_resolves_again() {
    use std::os::unix::fs::PermissionsExt;

    let sandbox = Sandbox::new(&["github.com/lunny/tango", "github.com/nobody/missing"]);
    let fake_go = sandbox.project.join("fake-go.sh");
    write(
        &fake_go,
        "#!/bin/sh\n\
         if [ \"$1\" = \"get\" ]; then\n\
         \tmkdir -p \"$GOPATH/src/$3\"\n\
         \tprintf 'package missing\\n' > \"$GOPATH/src/$3/m.go\"\n\
         \texit 0\n\
         fi\n\
         exit 1\n",
    );
    fs::set_permissions(&fake_go, fs::Permissions::from_mode(0o755)).unwrap();

    let output = sandbox
        .gop()
        .env("GOP_GO", &fake_go)
        .args(["ensure", "--get"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "Copying github.com/lunny/tango\n\
         Copying github.com/lunny/log\n\
         Downloading github.com/nobody/missing\n\
         Copying github.com/nobody/missing\n"
    );
    assert!(sandbox.vendor("github.com/nobody/missing/m.go").is_file());
}
