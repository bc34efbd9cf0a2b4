// ABOUTME: Deploy command implementation.
// ABOUTME: Prints the header, runs one deployment, then optionally hands a successful start to the watch loop.

use atroctl::bundle::EsbuildBundler;
use atroctl::config::Settings;
use atroctl::error::Result;
use atroctl::output::Output;
use atroctl::strategy::Deployer;
use atroctl::target::HttpTransport;
use atroctl::watch;

/// Run one deployment; with watch mode on, keep redeploying on changes.
///
/// A failed first run is returned as the command's error, with or without
/// watch mode. Once watching, failed runs are only reported.
pub async fn deploy(settings: Settings, mut output: Output) -> Result<()> {
    output.start_timer();
    output.header(
        env!("CARGO_PKG_VERSION"),
        &settings.target.base_url.to_string(),
        settings.deploy.strategy.name(),
    );

    let deploy = &settings.deploy;
    let deployer = Deployer::new(
        HttpTransport::new(settings.target.clone()),
        EsbuildBundler::new(&deploy.esbuild),
        deploy,
        output.clone(),
    );

    let report = deployer.deploy().await?;
    output.success(&format!("deployed {}", report.id));

    if !deploy.watch {
        return Ok(());
    }

    let mut roots = vec![deploy.func_dir.clone()];
    roots.extend(deploy.static_dir.clone());
    let (watcher, events) = watch::start(&roots)?;
    output.tagged(
        "watch",
        &format!("watching {} directories for changes", watcher.dirs().len()),
    );

    watch::drive(events, || deployer.deploy(), &output).await;
    drop(watcher);
    Ok(())
}
