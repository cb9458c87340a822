//! Plan writers for `value-synth`.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use std::io::Write;
use tracing::info;
use value_synth::EmissionPlan;

use crate::error::CliError;

fn io_error(path: &Utf8Path) -> impl FnOnce(std::io::Error) -> CliError + '_ {
    move |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Serialises every plan as one JSON array.
pub fn render_all(plans: &[EmissionPlan], should_pretty_print: bool) -> Result<String, CliError> {
    let text = if should_pretty_print {
        serde_json::to_string_pretty(plans)?
    } else {
        serde_json::to_string(plans)?
    };
    Ok(text)
}

/// Writes the plans as a JSON array followed by a newline.
pub fn print_all(
    out: &mut impl Write,
    plans: &[EmissionPlan],
    should_pretty_print: bool,
) -> Result<(), CliError> {
    let text = render_all(plans, should_pretty_print)?;
    writeln!(out, "{text}").map_err(io_error(Utf8Path::new("<stdout>")))
}

/// Writes one `<stem>.json` per plan under `out_dir`, creating it if needed.
///
/// Returns the written paths in plan order.
pub fn write_plans(
    out_dir: &Utf8Path,
    plans: &[EmissionPlan],
    should_pretty_print: bool,
) -> Result<Vec<Utf8PathBuf>, CliError> {
    let dir = ensure_dir(out_dir)?;
    let mut written = Vec::with_capacity(plans.len());
    for plan in plans {
        let filename = format!("{}.json", plan.file_stem());
        let path = out_dir.join(&filename);
        let mut file = dir
            .open_with(
                &filename,
                OpenOptions::new().write(true).create(true).truncate(true),
            )
            .map_err(io_error(&path))?;
        let content = plan.to_json(should_pretty_print)?;
        file.write_all(content.as_bytes()).map_err(io_error(&path))?;
        info!(%path, value_type = %plan.value_type, "wrote plan");
        written.push(path);
    }
    Ok(written)
}

fn ensure_dir(path: &Utf8Path) -> Result<Dir, CliError> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(dir),
        Err(open_err) if open_err.kind() == std::io::ErrorKind::NotFound => {
            Dir::create_ambient_dir_all(path, ambient_authority()).map_err(io_error(path))?;
            Dir::open_ambient_dir(path, ambient_authority()).map_err(io_error(path))
        }
        Err(open_err) => Err(io_error(path)(open_err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, ensure};
    use rstest::rstest;
    use test_helpers::fixtures::person_schema;

    fn person_plan() -> Result<EmissionPlan> {
        Ok(value_synth::synthesize(&person_schema()?)?)
    }

    #[rstest]
    fn plans_land_in_nested_directories() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .map_err(|path| anyhow::anyhow!("non-UTF-8 temp dir {}", path.display()))?;
        let out_dir = root.join("plans").join("nested");
        let written = write_plans(&out_dir, &[person_plan()?], false)?;
        ensure!(
            written == [out_dir.join("PersonBuilder.plan.json")],
            "got {written:?}"
        );
        let text = std::fs::read_to_string(out_dir.join("PersonBuilder.plan.json"))?;
        let back: EmissionPlan = serde_json::from_str(&text)?;
        ensure!(back.builder.name == "PersonBuilder", "round trip kept the builder");
        Ok(())
    }

    #[rstest]
    fn stdout_form_is_one_array_per_run() -> Result<()> {
        let mut out = Vec::new();
        print_all(&mut out, &[person_plan()?, person_plan()?], true)?;
        let value: serde_json::Value = serde_json::from_slice(&out)?;
        let count = value.as_array().map(Vec::len);
        ensure!(count == Some(2), "got {count:?}");
        ensure!(out.ends_with(b"\n"), "output ends with a newline");
        Ok(())
    }
}
