use anyhow::Context;
use log::info;
use quaternion_ekf_codegen::{Generator, GeneratorConfig};
use std::io::Write;

mod logger;

fn main() -> anyhow::Result<()> {
    logger::StderrLogger::init().context("failed to install the logger")?;

    // Render everything before writing so a failure never leaves partial output.
    let equations = Generator::new(GeneratorConfig::default())
        .generate()
        .context("failed to generate the prediction equations")?;
    let rendered = equations.to_string();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    out.write_all(rendered.as_bytes())
        .and_then(|()| out.flush())
        .context("failed to write the equations to stdout")?;

    info!("Wrote {} bytes", rendered.len());
    Ok(())
}
