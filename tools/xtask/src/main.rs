//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 fx-runtime 覆盖率
//! - `cov-workspace`: 运行 workspace 覆盖率
//! - `config-check`: 检查页面特效配置（JSON 文件或 HTML 内嵌配置块）
//! - `dist`: 构建 wasm 并与静态页面一起输出到发布目录

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use fx_runtime::FxConfig;
use walkdir::WalkDir;
use xshell::{Shell, cmd};

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    match cmd.status() {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            // host-web 的测试只在浏览器里跑（wasm-pack test）
            let mut test = Command::new("cargo");
            test.args(["test", "--workspace", "--exclude", "host-web"]);
            run("cargo test --workspace --exclude host-web", &mut test)?;
        }
        "cov-runtime" => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "fx-runtime", "--all-features", "--html"]);
            run(
                "cargo llvm-cov -p fx-runtime --all-features --html",
                &mut cov,
            )?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "cov-workspace" => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args([
                "llvm-cov",
                "--workspace",
                "--exclude",
                "xtask",
                "--exclude",
                "host-web",
                "--all-features",
                "--html",
            ]);
            run(
                "cargo llvm-cov --workspace --exclude xtask --exclude host-web --all-features --html",
                &mut cov,
            )?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "config-check" => {
            let path = args.next();
            config_check(path.as_deref())?;
        }
        "dist" => {
            let out = args.next().unwrap_or_else(|| "dist".to_string());
            dist(Path::new(SITE_DIR), Path::new(&out))?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-runtime     运行 fx-runtime 覆盖率报告
  cov-workspace   运行 workspace 覆盖率报告
  config-check    检查页面特效配置
  dist            构建发布目录

CONFIG-CHECK:
  cargo xtask config-check [path]

  不带参数：检查 site/ 下所有 .json 与 .html 文件
  带路径参数：检查指定文件或目录

  .html 文件检查其中 id="fx-config" 的配置块；没有配置块的页面跳过。

DIST:
  cargo xtask dist [output-dir]

  需要 wasm32-unknown-unknown target 与 wasm-bindgen-cli。
  输出目录默认为 dist/。

ALIASES (in .cargo/config.toml):
  cargo check-all     -> cargo xtask check-all
  cargo cov-runtime   -> cargo xtask cov-runtime
  cargo cov-workspace -> cargo xtask cov-workspace
  cargo config-check  -> cargo xtask config-check
"#
    );
}

//=============================================================================
// config-check 命令实现
//=============================================================================

/// 静态页面目录（相对于 workspace root）
const SITE_DIR: &str = "site";

/// 配置块的起始标记
const CONFIG_MARKER: &str = r#"id="fx-config""#;

/// 单个文件的检查结果
enum CheckOutcome {
    Valid,
    /// HTML 中没有配置块
    NoConfig,
    Invalid(String),
}

fn config_check(path: Option<&str>) -> anyhow::Result<()> {
    let files = match path {
        Some(p) => {
            let path = PathBuf::from(p);
            if path.is_file() {
                vec![path]
            } else if path.is_dir() {
                collect_config_files(&path)
            } else {
                anyhow::bail!("路径不存在: {}", p);
            }
        }
        None => {
            let dir = Path::new(SITE_DIR);
            if !dir.exists() {
                anyhow::bail!(
                    "默认页面目录不存在: {}\n请在 workspace 根目录运行，或指定配置路径",
                    dir.display()
                );
            }
            collect_config_files(dir)
        }
    };

    if files.is_empty() {
        eprintln!("未找到配置文件（.json / .html）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个文件...\n", files.len());

    let mut errors = 0;
    let mut checked = 0;
    for file in &files {
        match check_config_file(file) {
            CheckOutcome::Valid => {
                checked += 1;
                eprintln!("[OK] {}", file.display());
            }
            CheckOutcome::NoConfig => {}
            CheckOutcome::Invalid(message) => {
                checked += 1;
                errors += 1;
                eprintln!("[ERROR] {}: {}", file.display(), message);
            }
        }
    }

    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 份配置", checked);
    if errors > 0 {
        eprintln!("❌ {} 个错误", errors);
        anyhow::bail!("配置检查发现错误");
    }
    eprintln!("✅ 检查通过，无错误");
    Ok(())
}

/// 收集目录下的 .json / .html 文件
fn collect_config_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext == "json" || ext == "html")
        })
        .collect();
    files.sort();
    files
}

fn check_config_file(file: &Path) -> CheckOutcome {
    let content = match std::fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => return CheckOutcome::Invalid(format!("无法读取文件 - {e}")),
    };

    let json = if file.extension().is_some_and(|ext| ext == "html") {
        match extract_config_block(&content) {
            Some(block) => block,
            None => return CheckOutcome::NoConfig,
        }
    } else {
        content.as_str()
    };

    match FxConfig::from_json(json) {
        Ok(_) => CheckOutcome::Valid,
        Err(e) => CheckOutcome::Invalid(e.to_string()),
    }
}

/// 取出 `<script ... id="fx-config">...</script>` 的内容
fn extract_config_block(html: &str) -> Option<&str> {
    let marker = html.find(CONFIG_MARKER)?;
    let rest = &html[marker..];
    let open_end = rest.find('>')? + 1;
    let body = &rest[open_end..];
    let close = body.find("</script>")?;
    Some(&body[..close])
}

//=============================================================================
// dist 命令实现
//=============================================================================

const WASM_TARGET: &str = "wasm32-unknown-unknown";

fn dist(site: &Path, out: &Path) -> anyhow::Result<()> {
    if !site.is_dir() {
        anyhow::bail!("页面目录不存在: {}", site.display());
    }

    let sh = Shell::new()?;

    eprintln!("\n==> 构建 host-web ({WASM_TARGET})");
    cmd!(
        sh,
        "cargo build -p host-web --release --target {WASM_TARGET}"
    )
    .run()?;

    if out.exists() {
        sh.remove_path(out)?;
    }
    sh.create_dir(out)?;

    eprintln!("\n==> 复制静态页面 {} -> {}", site.display(), out.display());
    let copied = copy_tree(&sh, site, out)?;
    eprintln!("   文件数: {copied}");

    let wasm = PathBuf::from("target")
        .join(WASM_TARGET)
        .join("release")
        .join("host_web.wasm");
    let pkg = out.join("pkg");
    eprintln!("\n==> 生成 JS 绑定 -> {}", pkg.display());
    cmd!(sh, "wasm-bindgen --target web --out-dir {pkg} {wasm}").run()?;

    eprintln!("\n✅ 发布目录已生成: {}", out.display());
    Ok(())
}

/// 递归复制目录，返回复制的文件数
fn copy_tree(sh: &Shell, from: &Path, to: &Path) -> anyhow::Result<usize> {
    let mut count = 0;
    for entry in WalkDir::new(from).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        let relative = path.strip_prefix(from)?;
        let target = to.join(relative);
        if let Some(parent) = target.parent() {
            sh.create_dir(parent)?;
        }
        sh.copy_file(path, &target)?;
        count += 1;
    }
    Ok(count)
}
