use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{exit, Command};

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const LAMBDA_PACKAGE: &str = "task_dispatch_lambda";
const LAMBDA_BINARY: &str = "dispatch_lambda";
const DIST_DIR: &str = "infra/task_dispatch/dist";

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the task dispatch workspace",
    long_about = "A unified CLI for CI checks, Lambda packaging, and local\n\
                  trigger fixtures in the task dispatch workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the workspace tests
    Test,
    /// Run CI checks (fmt, clippy, tests, packaging)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Build and package the dispatcher Lambda as a `bootstrap` zip
    LambdaPackage {
        /// Compilation target triple for the Lambda binary
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Build profile used for the binary
        #[arg(value_enum, long, default_value_t = BuildProfile::Release)]
        profile: BuildProfile,
    },
    /// Write a storage notification fixture for local invocation
    SampleEvent {
        /// Bucket name placed in the record
        #[arg(long, default_value = "raw-ingest")]
        bucket: String,
        /// Object key placed in the record, already form-encoded
        #[arg(long, default_value = "exports/sample+file.csv")]
        key: String,
        /// Output file path
        #[arg(long, default_value = "trigger_event.json")]
        output: String,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Build and package the Lambda artifact
    Package,
    /// Run check + package
    All,
}

#[derive(Clone, Copy, ValueEnum)]
enum BuildProfile {
    Debug,
    Release,
}

impl BuildProfile {
    fn dir_name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    fn as_cargo_flag(self) -> Option<&'static str> {
        match self {
            Self::Debug => None,
            Self::Release => Some("--release"),
        }
    }
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n--- {label}");
}

fn run_cargo(args: &[&str]) {
    eprintln!("$ cargo {}", args.join(" "));
    let status = Command::new("cargo")
        .args(args)
        .status()
        .unwrap_or_else(|error| fail(&format!("could not start cargo: {error}")));
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn fail(message: &str) -> ! {
    eprintln!("error: {message}");
    exit(1);
}

fn package_dispatch_lambda(target: &str, profile: BuildProfile) {
    if !is_lambda_target(target) {
        fail(&format!(
            "Lambda runs on Linux; `{target}` is not a linux target triple"
        ));
    }
    check_target_installed(target);

    step("Build dispatcher lambda binary");
    let mut cargo_args = vec![
        "build",
        "-p",
        LAMBDA_PACKAGE,
        "--target",
        target,
        "--bin",
        LAMBDA_BINARY,
    ];
    if let Some(flag) = profile.as_cargo_flag() {
        cargo_args.push(flag);
    }
    run_cargo(&cargo_args);

    step("Zip binary as bootstrap");
    let binary_path = Path::new("target")
        .join(target)
        .join(profile.dir_name())
        .join(LAMBDA_BINARY);
    let dist_dir = Path::new(DIST_DIR);
    fs::create_dir_all(dist_dir)
        .unwrap_or_else(|error| fail(&format!("cannot create {DIST_DIR}: {error}")));

    let zip_path = dist_dir.join("dispatch.zip");
    write_bootstrap_zip(&binary_path, &zip_path);

    eprintln!("\nDispatcher artifact ready: {}", zip_path.display());
}

fn is_lambda_target(target: &str) -> bool {
    target.ends_with("-unknown-linux-gnu") || target.ends_with("-unknown-linux-musl")
}

/// Skips the check when rustup is absent (e.g. a distro-packaged toolchain).
fn check_target_installed(target: &str) {
    let Ok(output) = Command::new("rustup")
        .args(["target", "list", "--installed"])
        .output()
    else {
        eprintln!("warning: rustup not found, assuming `{target}` is available");
        return;
    };

    let installed = String::from_utf8_lossy(&output.stdout);
    if output.status.success() && !installed.lines().any(|line| line.trim() == target) {
        fail(&format!(
            "target `{target}` is missing; run `rustup target add {target}` first"
        ));
    }
}

fn write_bootstrap_zip(binary_path: &Path, zip_path: &Path) {
    let binary = fs::read(binary_path).unwrap_or_else(|error| {
        fail(&format!(
            "cannot read dispatcher binary at {}: {error}",
            binary_path.display()
        ))
    });

    let file = fs::File::create(zip_path)
        .unwrap_or_else(|error| fail(&format!("cannot create {}: {error}", zip_path.display())));
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);

    let written = zip
        .start_file("bootstrap", options)
        .map_err(|error| error.to_string())
        .and_then(|()| zip.write_all(&binary).map_err(|error| error.to_string()))
        .and_then(|()| zip.finish().map(|_| ()).map_err(|error| error.to_string()));
    if let Err(error) = written {
        fail(&format!("cannot write {}: {error}", zip_path.display()));
    }
}

fn write_sample_event(bucket: &str, key: &str, output: &str) {
    let event = json!({
        "Records": [
            {
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "s3SchemaVersion": "1.0",
                    "bucket": {
                        "name": bucket,
                        "arn": format!("arn:aws:s3:::{bucket}"),
                    },
                    "object": {
                        "key": key,
                    },
                },
            }
        ]
    });

    let body = serde_json::to_string_pretty(&event).expect("sample event should serialize");
    fs::write(output, body).expect("failed to write sample event");
    eprintln!("Wrote sample trigger event to {output}");
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test task_dispatch_core");
    run_cargo(&["test", "-p", "task_dispatch_core"]);

    step("Test task_dispatch_lambda");
    run_cargo(&["test", "-p", LAMBDA_PACKAGE]);
}

fn ci_package() {
    package_dispatch_lambda("x86_64-unknown-linux-gnu", BuildProfile::Release);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Test => {
            run_cargo(&["test", "--workspace"]);
        }
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Package => ci_package(),
                CiJob::All => {
                    ci_check();
                    ci_package();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::LambdaPackage { target, profile } => {
            package_dispatch_lambda(&target, profile);
        }
        Commands::SampleEvent {
            bucket,
            key,
            output,
        } => {
            write_sample_event(&bucket, &key, &output);
        }
    }
}
