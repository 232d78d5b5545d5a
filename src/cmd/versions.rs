//! Versions command implementation

use anyhow::Result;

use crate::config::ConfigFile;
use crate::context::AnalyzerContext;
use crate::report::{render_versions, to_json, VersionsReport};
use crate::source::SnapshotSource;

/// List versions for one platform, or for every platform
pub fn cmd_versions(config: &ConfigFile, platform: Option<&str>, json: bool) -> Result<()> {
    let ctx = AnalyzerContext::from_config(config);
    print!("{}", versions_impl(&ctx, platform, json)?);
    Ok(())
}

pub(crate) fn versions_impl<S: SnapshotSource>(
    ctx: &AnalyzerContext<S>,
    platform: Option<&str>,
    json: bool,
) -> Result<String> {
    let platforms: Vec<String> = match platform {
        Some(platform) => vec![platform.to_string()],
        None => ctx.index()?.platforms().map(str::to_string).collect(),
    };

    let reports = platforms
        .into_iter()
        .map(|platform| -> Result<VersionsReport> {
            let versions = ctx.versions(&platform)?;
            Ok(VersionsReport { platform, versions })
        })
        .collect::<Result<Vec<_>>>()?;

    if json {
        return Ok(format!("{}\n", to_json(&reports)?));
    }
    let rendered = reports
        .iter()
        .map(|r| render_versions(&r.platform, &r.versions))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rendered.join("\n"))
}
