use agenda_core::repository::Repository;
use agenda_core::statistics::Summary;
use anyhow::Result;

use crate::util;

pub fn show_stats(repo: &impl Repository) -> Result<()> {
    let summary = Summary::compute(&repo.all_expanded(), util::now());
    print!("{}", summary);
    Ok(())
}
