use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{debug, info, info_span};

use interflow_cli::input::{
    load_coverage, load_needs, load_receptions, load_repatriations, load_stock,
};
use interflow_cli::screen::{self, NeedRow};
use interflow_coverage::{CoverageAnalysis, HorizonWindow, Inventory, analyse};
use interflow_filter::{FileCache, FilterCache, FilterStore, InitSource, MemoryLocation};
use interflow_model::{CoverageRecord, Need};

use crate::cli::{AnalyseArgs, NeedsArgs, StockArgs};

/// What the needs screen ended up showing.
pub struct NeedsView {
    pub url: String,
    pub source: InitSource,
    pub rows: Vec<NeedRow>,
    pub total: usize,
}

pub struct FiltersView {
    pub route: String,
    pub path: PathBuf,
    pub entry: Option<String>,
}

pub fn open_cache(cache_file: Option<&Path>) -> Result<FileCache> {
    match cache_file {
        Some(path) => Ok(FileCache::new(path)),
        None => FileCache::open_default().context("locate filter cache"),
    }
}

pub fn run_needs(args: &NeedsArgs, cache: FileCache) -> Result<NeedsView> {
    let span = info_span!("needs", route = %args.route);
    let _guard = span.enter();

    let needs = load_needs(&args.needs)?;
    let records = match &args.coverage {
        Some(path) => load_coverage(path)?,
        None => computed_records(&needs, &args.stock)?,
    };

    let location = MemoryLocation::new(args.route.clone(), args.query.as_deref().unwrap_or(""));
    let mut store = FilterStore::open(screen::filter_defaults(), location, cache);
    let source = store.source();
    if args.reset {
        store.reset();
    }
    if !args.set.is_empty() {
        store.update_many(args.set.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    for column in &args.sort {
        let state = screen::toggle_sort(&mut store, column);
        debug!(%column, ?state, "sort toggled");
    }

    let rows = screen::build_rows(&needs, &records, store.state());
    info!(needs = needs.len(), shown = rows.len(), "needs screen ready");
    Ok(NeedsView {
        url: store.location().url(),
        source,
        rows,
        total: needs.len(),
    })
}

pub fn run_analyse(args: &AnalyseArgs) -> Result<CoverageAnalysis> {
    let span = info_span!("analyse");
    let _guard = span.enter();

    let needs = load_needs(&args.needs)?;
    let needs: Vec<Need> = match &args.material {
        Some(code) => needs
            .into_iter()
            .filter(|need| need.material_code() == code)
            .collect(),
        None => needs,
    };
    let inventory = load_inventory(&args.stock)?;
    let window = if args.all {
        None
    } else {
        let start = args.start.unwrap_or_else(|| Local::now().date_naive());
        Some(HorizonWindow::new(start, args.horizon)?)
    };
    Ok(analyse(&needs, &inventory, window))
}

pub fn run_filters_show(route: &str, cache: &FileCache) -> Result<FiltersView> {
    let entry = cache.read(route).context("read filter cache")?;
    Ok(FiltersView {
        route: route.to_string(),
        path: cache.path().to_path_buf(),
        entry,
    })
}

pub fn run_filters_reset(route: &str, mut cache: FileCache) -> Result<()> {
    cache.remove(route).context("clear filter cache")?;
    info!(route, path = %cache.path().display(), "filters reset");
    Ok(())
}

fn computed_records(needs: &[Need], args: &StockArgs) -> Result<Vec<CoverageRecord>> {
    if args.stock.is_none() && args.repatriations.is_none() {
        debug!("no coverage input, keeping declared states");
        return Ok(Vec::new());
    }
    let inventory = load_inventory(args)?;
    let analysis = analyse(needs, &inventory, None);
    Ok(analysis.records().cloned().collect())
}

fn load_inventory(args: &StockArgs) -> Result<Inventory> {
    let mut inventory = Inventory::default();
    if let Some(path) = &args.stock {
        inventory.stock = load_stock(path)?;
    }
    if let Some(path) = &args.repatriations {
        inventory.repatriations = load_repatriations(path)?;
    }
    if let Some(path) = &args.receptions {
        inventory.receptions = load_receptions(path)?;
    }
    Ok(inventory)
}
