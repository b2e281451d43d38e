//! Bulk edits of cores and claims in `history/states`.

use anyhow::{Context, Result, bail};
use hoi4data::history::{State, load_states_dir, write_state};
use hoi4data::map::{ProvinceDefinition, load_definitions};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Which states to touch and what to change in them.
#[derive(Debug, Clone, Default)]
pub struct CoreEdit {
    /// Only states cored by one of these tags. Empty matches every state.
    pub if_core: Vec<String>,
    /// Only states whose first province lies on this continent.
    pub continent: Option<u32>,
    /// Cores to add.
    pub add: Vec<String>,
    /// Tags to strip from both cores and claims.
    pub remove: Vec<String>,
    /// Report without writing.
    pub dry_run: bool,
}

impl CoreEdit {
    fn selects(&self, state: &State, provinces: &BTreeMap<u32, ProvinceDefinition>) -> bool {
        if !self.if_core.is_empty()
            && !state.history.cores.iter().any(|c| self.if_core.contains(c))
        {
            return false;
        }
        match self.continent {
            Some(continent) => state
                .provinces
                .first()
                .and_then(|id| provinces.get(id))
                .is_some_and(|def| def.continent == continent),
            None => true,
        }
    }

    /// Applies the edit to one state. Returns whether it changed.
    pub fn apply(&self, state: &mut State) -> bool {
        let mut changed = false;
        for tag in &self.add {
            changed |= state.history.add_core(tag);
        }
        for tag in &self.remove {
            changed |= state.history.remove_tag(tag);
        }
        changed
    }
}

/// Runs `edit` over every state file of `mod_root`. Returns the changed files.
pub fn edit_cores(mod_root: &Path, edit: &CoreEdit) -> Result<Vec<PathBuf>> {
    if edit.add.is_empty() && edit.remove.is_empty() {
        bail!("nothing to do: pass --add or --remove");
    }

    let provinces = match edit.continent {
        Some(_) => {
            let path = mod_root.join("map").join("definition.csv");
            load_definitions(&path).with_context(|| format!("loading {}", path.display()))?
        }
        None => BTreeMap::new(),
    };

    let states = load_states_dir(mod_root).context("loading state history")?;
    let mut changed = Vec::new();
    for (path, mut state) in states {
        if !edit.selects(&state, &provinces) || !edit.apply(&mut state) {
            continue;
        }
        if edit.dry_run {
            log::info!("would update {}", path.display());
        } else {
            write_state(&path, &state).with_context(|| format!("writing {}", path.display()))?;
            log::info!("updated {}", path.display());
        }
        changed.push(path);
    }
    Ok(changed)
}
