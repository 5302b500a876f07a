// build.rs - TOML-driven compile-time constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    input: InputLimits,
    syntax: SyntaxLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct InputLimits {
    rewind_window: usize,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    initial_stack_capacity: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=LL1_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=LL1_CONFIG_DIR");

    let profile = env::var("LL1_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("LL1_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the ll1_frontend directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());
    println!("cargo:rustc-env=LL1_BUILD_PROFILE={}", profile);
    println!("cargo:rustc-env=LL1_CONFIG_DIR={}", config_dir);

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    // The tokenizer may need to re-read everything scanned past the last acceptance point.
    const MIN_REWIND_WINDOW: usize = 10;

    if config.input.rewind_window < MIN_REWIND_WINDOW {
        panic!(
            "input.rewind_window must be at least {} (got {})",
            MIN_REWIND_WINDOW, config.input.rewind_window
        );
    }

    if config.syntax.initial_stack_capacity == 0 {
        panic!("syntax.initial_stack_capacity cannot be zero");
    }

    if config.logging.log_buffer_size < 100 || config.logging.log_buffer_size > 100_000 {
        panic!(
            "logging.log_buffer_size out of range 100..=100000 (got {})",
            config.logging.log_buffer_size
        );
    }

    if profile == "production" && config.input.rewind_window > 1_000_000 {
        panic!("PRODUCTION: input.rewind_window too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod input {{
        pub const REWIND_WINDOW: usize = {};
    }}

    pub mod syntax {{
        pub const INITIAL_STACK_CAPACITY: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        config.input.rewind_window,
        config.syntax.initial_stack_capacity,
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
    );

    fs::write(output_path, constants_code).unwrap();
}
