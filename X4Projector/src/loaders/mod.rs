//! Game object loaders.
//!
//! The extraction tables in [`macro_props`] and [`component_props`] are
//! registered per class into a [`ParserRegistry`]; the loader functions walk
//! the asset directories of the base game (or one extension) and feed every
//! matching macro document into the database. Records referenced by the
//! loaded ones are pulled in afterwards by
//! [`MacroDatabase::resolve_dependencies`].

mod component_props;
mod helpers;
mod macro_props;
mod wares;

pub use wares::load_wares;

use std::rc::Rc;

use x4data::lang::LanguageResolver;
use x4data::macros::{MacroDatabase, ParserRegistry, Properties};
use x4data::vfs::GameFs;

/// Ship size classes, smallest first.
pub const SHIP_SIZES: [&str; 5] = ["xs", "s", "m", "l", "xl"];

/// Map a path relative to a tree root onto the base game or an extension.
#[must_use]
pub fn path_in_extension(path: &str, ext: Option<&str>) -> String {
    match ext {
        Some(name) => format!("extensions/{name}/{path}"),
        None => path.to_string(),
    }
}

/// Build the extraction registry for every known macro and component class.
///
/// Classes the exporters have no use for (`cockpit`, `buildmodule`,
/// `buildprocessor`, `destructible`) get explicit no-op entries so they do
/// not show up as unknown classes in the logs.
#[must_use]
pub fn registry(lang: Rc<LanguageResolver>) -> ParserRegistry {
    let mut registry = ParserRegistry::new();

    for class in SHIP_SIZES.map(|size| format!("ship_{size}")) {
        let lang = Rc::clone(&lang);
        registry.register_macro(&class, move |_name, class, node| {
            macro_props::ship(&lang, class, node)
        });
        registry.register_component(&class, |_name, _class, node| component_props::ship(node));
    }

    let l = Rc::clone(&lang);
    registry.register_macro("spacesuit", move |_name, _class, node| {
        macro_props::spacesuit(&l, node)
    });

    registry.register_macro("storage", |_name, _class, node| macro_props::storage(node));
    registry.register_component("storage", noop);

    let l = Rc::clone(&lang);
    registry.register_macro("engine", move |_name, _class, node| {
        macro_props::engine(&l, node)
    });
    registry.register_component("engine", |name, _class, node| {
        component_props::engine(name, node)
    });

    let l = Rc::clone(&lang);
    registry.register_macro("dockingbay", move |_name, _class, node| {
        macro_props::dockingbay(&l, node)
    });
    registry.register_component("dockingbay", noop);

    let l = Rc::clone(&lang);
    registry.register_macro("dockarea", move |_name, _class, node| {
        macro_props::dockarea(&l, node)
    });
    registry.register_component("dockarea", noop);

    let l = Rc::clone(&lang);
    registry.register_macro("shieldgenerator", move |_name, _class, node| {
        macro_props::shieldgenerator(&l, node)
    });
    registry.register_component("shieldgenerator", |name, _class, node| {
        component_props::shieldgenerator(name, node)
    });

    for class in ["weapon", "turret", "bomblauncher"] {
        let l = Rc::clone(&lang);
        registry.register_macro(class, move |_name, _class, node| {
            macro_props::weapon(&l, node)
        });
    }
    registry.register_component("weapon", |name, _class, node| {
        component_props::weapon(name, node)
    });
    registry.register_component("turret", |name, _class, node| {
        component_props::turret(name, node)
    });
    registry.register_component("bomblauncher", |name, _class, node| {
        component_props::bomblauncher(name, node)
    });

    registry.register_macro("bullet", |_name, _class, node| macro_props::bullet(node));
    registry.register_component("bullet", noop);

    for class in ["missilelauncher", "missileturret"] {
        let l = Rc::clone(&lang);
        registry.register_macro(class, move |_name, _class, node| {
            macro_props::missilelauncher(&l, node)
        });
        registry.register_component(class, |name, _class, node| {
            component_props::missilelauncher(name, node)
        });
    }

    for class in ["missile", "bomb"] {
        let l = Rc::clone(&lang);
        registry.register_macro(class, move |_name, _class, node| {
            macro_props::missile(&l, node)
        });
        registry.register_component(class, noop);
    }

    for class in ["cockpit", "buildmodule", "buildprocessor", "destructible"] {
        registry.register_macro(class, noop);
        registry.register_component(class, noop);
    }

    registry
}

fn noop(_name: &str, _class: &str, _node: &x4data::xml::XmlNode) -> Properties {
    Properties::new()
}

/// Load every macro file in a game directory whose name passes the filter.
/// A directory that does not exist in this tree is skipped quietly; a file
/// that fails to load is logged and skipped.
fn load_dir<F: GameFs>(
    db: &mut MacroDatabase<F>,
    dir: &str,
    filter: impl Fn(&str) -> bool,
) -> usize {
    let entries = match db.fs_mut().list(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(dir, error = %err, "skipping unavailable directory");
            return 0;
        }
    };

    let mut loaded = 0;
    for entry in entries {
        if !filter(&entry.name) {
            continue;
        }
        match db.load_macro_file(&entry.path) {
            Ok(()) => loaded += 1,
            Err(err) => {
                tracing::error!(path = %entry.path, error = %err, "failed to load macro file");
            }
        }
    }

    loaded
}

/// Load ship macros of every size class. Returns the number of files loaded.
pub fn load_ships<F: GameFs>(db: &mut MacroDatabase<F>, ext: Option<&str>) -> usize {
    let units_root = path_in_extension("assets/units", ext);
    let mut loaded = 0;

    for size in SHIP_SIZES {
        loaded += load_dir(db, &format!("{units_root}/size_{size}/macros"), |_| true);
    }

    loaded
}

/// Load engine and thruster macros.
pub fn load_engines<F: GameFs>(db: &mut MacroDatabase<F>, ext: Option<&str>) -> usize {
    let dir = path_in_extension("assets/props/Engines/macros", ext);
    load_dir(db, &dir, |name| {
        name.starts_with("engine_") || name.starts_with("thruster_")
    })
}

/// Load shield generator macros.
pub fn load_shields<F: GameFs>(db: &mut MacroDatabase<F>, ext: Option<&str>) -> usize {
    let dir = path_in_extension("assets/props/SurfaceElements/macros", ext);
    load_dir(db, &dir, |name| name.starts_with("shield_"))
}

/// Load weapon, turret and bullet macros.
pub fn load_weapons<F: GameFs>(db: &mut MacroDatabase<F>, ext: Option<&str>) -> usize {
    let weapons_root = path_in_extension("assets/props/WeaponSystems", ext);
    let mut loaded = 0;

    for kind in [
        "capital",
        "heavy",
        "mining",
        "standard",
        "spacesuit",
        "energy",
        "xref_parts",
    ] {
        loaded += load_dir(db, &format!("{weapons_root}/{kind}/macros"), |name| {
            name.starts_with("weapon_")
                || name.starts_with("turret_")
                || name.starts_with("spacesuit_gen_laser_")
                || name.starts_with("spacesuit_gen_repairweapon_")
        });
    }

    let bullets_dir = path_in_extension("assets/fx/weaponFx/macros", ext);
    loaded += load_dir(db, &bullets_dir, |name| name.starts_with("bullet_"));

    loaded
}

/// Load missile launcher, missile and bomb macros.
pub fn load_missilelaunchers<F: GameFs>(db: &mut MacroDatabase<F>, ext: Option<&str>) -> usize {
    let weapons_root = path_in_extension("assets/props/WeaponSystems", ext);
    let mut loaded = 0;

    for kind in ["dumbfire", "guided", "torpedo", "spacesuit"] {
        loaded += load_dir(db, &format!("{weapons_root}/{kind}/macros"), |name| {
            name.starts_with("weapon_")
                || name.starts_with("turret_")
                || name.starts_with("spacesuit_gen_bomblauncher_")
        });
    }

    loaded += load_dir(db, &format!("{weapons_root}/missile/macros"), |name| {
        name.starts_with("missile_")
    });

    let bombs_dir = path_in_extension("assets/fx/weaponFx/macros", ext);
    loaded += load_dir(db, &bombs_dir, |name| name.starts_with("bomb_"));

    loaded
}
