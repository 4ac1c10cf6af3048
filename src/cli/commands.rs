use std::path::Path;

use crate::catalog::{PlantCatalog, PlantId};
use crate::cli::tally::{TrialTally, run_trials};
use crate::config::CrossbreedConfig;
use crate::mutation::{Crop, MutationRegistry, MutationResolver, NeighborSet};
use crate::rng::effective_seed;
use crate::rulebook::{LoadReport, RuleBook};

/// Inputs for a `resolve` run, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ResolveArgs {
    pub crop: String,
    pub neighbors: Vec<String>,
    pub trials: Option<u32>,
    pub seed: Option<u64>,
    pub light: Option<u8>,
    pub time: Option<u32>,
    pub tool: Option<String>,
    pub json: bool,
}

fn load_rule_book(
    rule_file: &Path,
) -> Result<(PlantCatalog, MutationRegistry, LoadReport), String> {
    let book = RuleBook::from_file(rule_file)?;
    Ok(book.load())
}

/// Load a rule book and report what was registered and what was rejected.
///
/// Returns an error when any entry was rejected, so scripts can gate on it.
pub fn check(rule_file: &Path) -> Result<(), String> {
    let (catalog, registry, report) = load_rule_book(rule_file)?;

    println!("=== Rule book: {} ===", rule_file.display());
    println!("Plants: {}", catalog.len());
    println!("Mutations: {}", registry.len());

    if !report.skipped_plants.is_empty() {
        println!();
        println!("--- Skipped plants ---");
        for id in &report.skipped_plants {
            println!("  {} (duplicate or empty id)", id);
        }
    }

    if report.rejected.is_empty() {
        println!("\nAll mutations valid");
        return Ok(());
    }

    println!();
    println!("--- Rejected mutations ---");
    for r in &report.rejected {
        println!("  [{}] -> {}: {}", r.index, r.child, r.reason);
    }
    Err(format!(
        "{} of {} mutation(s) rejected",
        report.rejected.len(),
        report.rejected.len() + report.registered.len()
    ))
}

/// Print mutations, optionally filtered by child or by parent.
pub fn list(rule_file: &Path, child: Option<&str>, parent: Option<&str>) -> Result<(), String> {
    let (catalog, registry, _) = load_rule_book(rule_file)?;

    let rules: Vec<_> = match (child, parent) {
        (Some(_), Some(_)) => return Err("Specify at most one of --child or --parent".to_string()),
        (Some(c), None) => registry.rules_for_child(&PlantId::from(c)).collect(),
        (None, Some(p)) => registry.rules_with_parent(&PlantId::from(p)).collect(),
        (None, None) => registry.iter().collect(),
    };

    if rules.is_empty() {
        println!("No matching mutations");
        return Ok(());
    }

    for (id, rule) in &rules {
        let child_name = catalog
            .get(rule.child())
            .map(|v| v.name.as_str())
            .unwrap_or("?");
        println!("{:>5}  {}  [{}]", id.to_string(), rule, child_name);
    }
    println!("\n{} mutation(s)", rules.len());
    Ok(())
}

/// Resolve a crop against its neighbors over a batch of seeded trials.
pub fn resolve(
    config: &CrossbreedConfig,
    rule_file: &Path,
    args: &ResolveArgs,
) -> Result<TrialTally, String> {
    if !config.mutations_enabled {
        return Err("Mutations are disabled (mutations_enabled = false)".to_string());
    }

    let (catalog, registry, _) = load_rule_book(rule_file)?;
    let resolver = MutationResolver::new(&catalog, &registry, config.policy())
        .map_err(|e| e.to_string())?;

    let mut crop = Crop::new(args.crop.as_str());
    if let Some(light) = args.light {
        crop = crop.with_light(light);
    }
    if let Some(time) = args.time {
        crop = crop.with_time(time);
    }
    if let Some(tool) = &args.tool {
        crop = crop.with_tool(tool.as_str());
    }

    let neighbors: NeighborSet = args
        .neighbors
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect();
    let trials = args.trials.unwrap_or(config.trials);
    if trials == 0 {
        return Err("trials must be > 0".to_string());
    }
    let seed = effective_seed(args.seed.unwrap_or(config.seed));

    let tally =
        run_trials(&resolver, &crop, &neighbors, trials, seed).map_err(|e| e.to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(&tally).map_err(|e| e.to_string())?;
        println!("{}", json);
    } else {
        print_tally(&crop, &neighbors, &tally);
    }
    Ok(tally)
}

fn print_tally(crop: &Crop, neighbors: &NeighborSet, tally: &TrialTally) {
    let around: Vec<String> = neighbors
        .distinct()
        .map(|(id, n)| if n > 1 { format!("{}x{}", n, id) } else { id.to_string() })
        .collect();

    println!("=== {} next to [{}] ===", crop.variant, around.join(", "));
    println!("Seed: {}", tally.seed);
    println!("Trials: {}", tally.trials);
    println!(
        "Mutations: {} ({:.1}%), forced: {}",
        tally.mutations(),
        tally.mutation_rate() * 100.0,
        tally.forced
    );

    if tally.by_child.is_empty() {
        return;
    }
    println!();
    println!("--- Children ---");
    let mut sorted: Vec<_> = tally.by_child.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1));
    for (child, count) in sorted {
        let pct = (*count as f64 / tally.trials as f64) * 100.0;
        println!("  {}: {} ({:.1}%)", child, count, pct);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const BOOK: &str = r#"
        [[plant]]
        id = "wheat"
        [[plant]]
        id = "carrot"
        [[plant]]
        id = "hybrid"

        [[mutation]]
        child = "hybrid"
        parents = ["wheat", "carrot"]
        chance = 1.0
    "#;

    fn write_book(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("rules.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn resolve_reports_certain_mutation() {
        let dir = TempDir::new().unwrap();
        let path = write_book(&dir, BOOK);
        let args = ResolveArgs {
            crop: "wheat".to_string(),
            neighbors: vec!["carrot".to_string()],
            trials: Some(20),
            seed: Some(5),
            ..ResolveArgs::default()
        };

        let tally = resolve(&CrossbreedConfig::default(), &path, &args).unwrap();
        assert_eq!(tally.trials, 20);
        assert_eq!(tally.by_child[&PlantId::from("hybrid")], 20);
    }

    #[test]
    fn resolve_refused_when_disabled() {
        let dir = TempDir::new().unwrap();
        let path = write_book(&dir, BOOK);
        let config = CrossbreedConfig {
            mutations_enabled: false,
            ..CrossbreedConfig::default()
        };
        let args = ResolveArgs {
            crop: "wheat".to_string(),
            ..ResolveArgs::default()
        };

        let err = resolve(&config, &path, &args).unwrap_err();
        assert!(err.contains("disabled"));
    }

    #[test]
    fn resolve_unknown_crop_errors() {
        let dir = TempDir::new().unwrap();
        let path = write_book(&dir, BOOK);
        let args = ResolveArgs {
            crop: "durian".to_string(),
            neighbors: vec!["carrot".to_string()],
            seed: Some(1),
            ..ResolveArgs::default()
        };

        let err = resolve(&CrossbreedConfig::default(), &path, &args).unwrap_err();
        assert!(err.contains("durian"));
    }

    #[test]
    fn check_flags_rejected_rules() {
        let dir = TempDir::new().unwrap();
        let path = write_book(
            &dir,
            &format!("{}\n[[mutation]]\nchild = \"hybrid\"\nparents = []\nchance = 0.5\n", BOOK),
        );

        assert!(check(&path).unwrap_err().contains("1 of 2"));
    }

    #[test]
    fn check_passes_clean_book() {
        let dir = TempDir::new().unwrap();
        let path = write_book(&dir, BOOK);
        assert!(check(&path).is_ok());
    }

    #[test]
    fn list_rejects_both_filters() {
        let dir = TempDir::new().unwrap();
        let path = write_book(&dir, BOOK);
        assert!(list(&path, Some("hybrid"), Some("wheat")).is_err());
        assert!(list(&path, Some("hybrid"), None).is_ok());
    }
}
