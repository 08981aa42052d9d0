use crate::client::{AppContext, CliResult};

pub(crate) fn handle_import(ctx: &AppContext) -> CliResult<()> {
    let settings = ctx.load_settings()?;
    let store = ctx.open_store(&settings)?;
    let imported = store.import_missing(&settings.project_root)?;
    println!("Imported {imported} assets under {}.", settings.project_root);
    Ok(())
}
