//! Collects information about the build (Git revision, toolchain and the
//! compilation settings that change search speed) so that the engine can
//! report how it was built at startup.

use std::path::Path;
use std::{env, fs};

fn write_build_settings() -> shadow_rs::SdResult<()> {
    let out_dir = env::var("OUT_DIR")?;
    let settings = format!(
        "{} {} {}debug-assertions",
        env::var("TARGET")?,
        env::var("PROFILE")?,
        if cfg!(debug_assertions) { "+" } else { "-" },
    );
    fs::write(Path::new(&out_dir).join("features"), settings)?;
    Ok(())
}

fn main() -> shadow_rs::SdResult<()> {
    write_build_settings()?;
    shadow_rs::new()
}
