use std::fs::File;
use std::path::Path;
use std::rc::Rc;

use anyhow::Context as _;
use indexmap::IndexMap;

use x4data::macros::{MacroDatabase, Properties};
use x4data::vfs::GameFs;
use x4projector::export::{self, Format};
use x4projector::loaders;

use super::{build_fs, load_language, Context, ObjectKind};

pub fn execute(
    ctx: &Context,
    objects: &[ObjectKind],
    dir: &Path,
    format: Format,
) -> anyhow::Result<()> {
    let mut fs = build_fs(ctx)?;
    let resolver = Rc::new(load_language(&mut fs, &ctx.language)?);

    let mut db = MacroDatabase::with_registry(fs, loaders::registry(Rc::clone(&resolver)))?;

    let objects = ObjectKind::expand(objects);
    tracing::info!(
        objects = %objects.iter().map(|o| o.file_stem()).collect::<Vec<_>>().join(", "),
        "exporting stats"
    );

    let mut wares: IndexMap<String, Properties> = IndexMap::new();

    // base game first, then every mounted extension
    let mut sources: Vec<Option<String>> = vec![None];
    sources.extend(db.fs_mut().extensions().into_iter().map(Some));

    for source in &sources {
        let ext = source.as_deref();

        for kind in &objects {
            match kind {
                ObjectKind::Engines => {
                    loaders::load_engines(&mut db, ext);
                }
                ObjectKind::Missilelaunchers => {
                    loaders::load_missilelaunchers(&mut db, ext);
                }
                ObjectKind::Shields => {
                    loaders::load_shields(&mut db, ext);
                }
                ObjectKind::Ships => {
                    loaders::load_ships(&mut db, ext);
                }
                ObjectKind::Weapons => {
                    loaders::load_weapons(&mut db, ext);
                }
                ObjectKind::Wares => match loaders::load_wares(db.fs_mut(), &resolver, ext) {
                    Ok(batch) => wares.extend(batch),
                    Err(err) => {
                        tracing::warn!(extension = ?ext, error = %err, "no ware catalogue in this tree");
                    }
                },
                ObjectKind::All => {}
            }
        }

        let report = db.resolve_dependencies();
        if !report.complete {
            tracing::warn!(
                extension = ?ext,
                unresolved = report.unresolved.len(),
                "unresolved references remain"
            );
        }
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create export directory {}", dir.display()))?;

    for kind in &objects {
        let path = dir.join(format!("{}.{}", kind.file_stem(), format.extension()));
        let file = File::create(&path)
            .with_context(|| format!("cannot create {}", path.display()))?;

        match kind {
            ObjectKind::Engines => export::export_engines(&db, file, format)?,
            ObjectKind::Missilelaunchers => export::export_missilelaunchers(&db, file, format)?,
            ObjectKind::Shields => export::export_shields(&db, file, format)?,
            ObjectKind::Ships => export::export_ships(&db, file, format)?,
            ObjectKind::Wares => export::export_wares(&wares, file, format)?,
            ObjectKind::Weapons => export::export_weapons(&db, file, format)?,
            ObjectKind::All => {}
        }

        tracing::info!(path = %path.display(), "wrote export");
    }

    Ok(())
}
