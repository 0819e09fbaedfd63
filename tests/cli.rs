use assert_fs::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_lnegc")));
    cmd.env_remove("LNEGC_LANGUAGE");
    cmd
}

fn project() -> assert_fs::TempDir {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("lnegc/config.lnegc")
        .write_str(
            "# Projeto\nVersão: 1.0.0\nLinguagem_Padrão: Python\n\n\
             ## Configurações\n- Framework: FastAPI\n",
        )
        .unwrap();
    temp.child("lnegc/componentes/validador.lnegc")
        .write_str(
            "# Validador\nVersão: 1.0.0\n\n## Interface\n- Entrada: String\n- Saída: String\n",
        )
        .unwrap();
    temp
}

#[test]
fn compiles_project_with_language_override() {
    let temp = project();

    cmd()
        .current_dir(temp.path())
        .args(["--language", "go"])
        .assert()
        .success();

    temp.child("prompt.txt").assert(
        predicate::str::starts_with("Por favor, gere um componente em go")
            .and(predicate::str::contains("Entrada: String"))
            .and(predicate::str::contains("Saída: String")),
    );
}

#[test]
fn uses_project_language_and_custom_output() {
    let temp = project();
    let output = temp.child("out/prompts.txt");

    cmd()
        .args(["--dir", temp.child("lnegc").path().to_str().unwrap()])
        .args(["--output", output.path().to_str().unwrap()])
        .assert()
        .success();

    output.assert(predicate::str::contains("em Python"));
}

#[test]
fn dry_run_writes_nothing() {
    let temp = project();

    cmd()
        .current_dir(temp.path())
        .arg("--dry-run")
        .assert()
        .success();

    temp.child("prompt.txt").assert(predicate::path::missing());
}

#[test]
fn verbose_prints_summary() {
    let temp = project();

    cmd()
        .current_dir(temp.path())
        .args(["--dry-run", "-v"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LNEGC Compile Summary"));
}

#[test]
fn missing_directory_fails() {
    let temp = assert_fs::TempDir::new().unwrap();

    cmd()
        .current_dir(temp.path())
        .args(["--dir", "nao-existe"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:").and(predicate::str::contains("nao-existe")));
}

#[test]
fn directory_that_is_a_file_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("lnegc").write_str("not a directory").unwrap();

    cmd()
        .current_dir(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn missing_config_lists_probed_paths() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("a/b/lnegc/componentes/x.lnegc").write_str("# X\n").unwrap();

    cmd()
        .current_dir(temp.child("a/b").path())
        .assert()
        .code(1)
        .stderr(
            predicate::str::contains("Configuration file not found")
                .and(predicate::str::contains(".lnegc/config.lnegc")),
        );

    temp.child("a/b/prompt.txt").assert(predicate::path::missing());
}

#[test]
fn backup_keeps_previous_output() {
    let temp = project();
    temp.child("prompt.txt").write_str("versão anterior").unwrap();

    cmd()
        .current_dir(temp.path())
        .arg("--backup")
        .assert()
        .success();

    let backups = std::fs::read_dir(temp.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("prompt.txt.backup."))
        .count();
    assert_eq!(backups, 1);
}

#[test]
fn help_and_version() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dir").and(predicate::str::contains("--language")));

    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
