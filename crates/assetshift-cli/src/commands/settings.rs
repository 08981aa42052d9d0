use assetshift_config::{OrganizerSettings, save_settings};

use crate::cli::{SettingsInitArgs, SettingsSwapArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_settings;

pub(crate) fn handle_settings_init(ctx: &AppContext, args: &SettingsInitArgs) -> CliResult<()> {
    if ctx.settings_path.exists() && !args.force {
        return Err(CliError::validation(format!(
            "settings file {} already exists (pass --force to overwrite)",
            ctx.settings_path.display()
        )));
    }
    save_settings(&ctx.settings_path, &OrganizerSettings::defaults())?;
    println!("Wrote default settings to {}.", ctx.settings_path.display());
    Ok(())
}

pub(crate) fn handle_settings_show(ctx: &AppContext) -> CliResult<()> {
    let settings = ctx.load_settings()?;
    render_settings(&settings, ctx.output)
}

pub(crate) fn handle_settings_reset(ctx: &AppContext) -> CliResult<()> {
    let mut settings = ctx.load_settings()?;
    settings.reset_to_defaults();
    save_settings(&ctx.settings_path, &settings)?;
    println!("Settings reset to defaults.");
    Ok(())
}

pub(crate) fn handle_settings_swap(ctx: &AppContext, args: &SettingsSwapArgs) -> CliResult<()> {
    let mut settings = ctx.load_settings()?;
    let (from, to) = args.direction.actions();
    let changed = settings.retarget_actions(from, to);
    save_settings(&ctx.settings_path, &settings)?;
    println!(
        "Changed {changed} {} entries to {}.",
        from.as_str(),
        to.as_str()
    );
    Ok(())
}
