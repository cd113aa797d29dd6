use std::path::PathBuf;

use clap::Args;
use exalt_check::config::AppConfig;
use exalt_check::error::AppError;
use exalt_check::requirements::{
    exalted_thresholds, item_id_from_link, CharacterClass, EvaluationOutcome,
    ExaltedRequirementService, FsRuleSource, GearCheckRequest, Loadout, ScoreSource,
};

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Character class, e.g. `priest`
    #[arg(long)]
    pub(crate) class: Option<CharacterClass>,
    /// Weapon item id or wiki link
    #[arg(long)]
    pub(crate) weapon: Option<String>,
    /// Ability item id or wiki link
    #[arg(long)]
    pub(crate) ability: Option<String>,
    /// Armor item id or wiki link
    #[arg(long)]
    pub(crate) armor: Option<String>,
    /// Ring item id or wiki link
    #[arg(long)]
    pub(crate) ring: Option<String>,
    /// Take the class from the ability item when `--class` is omitted
    #[arg(long)]
    pub(crate) infer_class: bool,
    /// Directory holding the rulebook text files
    #[arg(long)]
    pub(crate) rules_dir: Option<PathBuf>,
    /// Print the outcome as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl CheckArgs {
    fn request(&self) -> GearCheckRequest {
        let slots = [&self.weapon, &self.ability, &self.armor, &self.ring].map(|raw| {
            raw.as_deref()
                .filter(|raw| !raw.trim().is_empty())
                .map(item_id_from_link)
        });
        let [weapon, ability, armor, ring] = slots;

        GearCheckRequest {
            class: self.class,
            loadout: Loadout::new(weapon, ability, armor, ring),
            infer_class: self.infer_class,
        }
    }
}

pub(crate) async fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let rules_dir = match args.rules_dir.clone() {
        Some(dir) => dir,
        None => AppConfig::load()?.rules.data_dir,
    };

    let service = ExaltedRequirementService::new(FsRuleSource::new(rules_dir));
    service.ensure_loaded().await?;
    let outcome = service.check(&args.request())?;

    if args.json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Outcome unavailable as JSON: {err}"),
        }
    } else {
        render_outcome(&outcome);
    }

    Ok(())
}

fn render_outcome(outcome: &EvaluationOutcome) {
    println!("Exalted Lost Halls gear check");
    println!(
        "Class: {}",
        outcome
            .class
            .map(|class| class.to_string())
            .unwrap_or_else(|| "none selected".to_string())
    );
    for (slot, item) in outcome.loadout.slots() {
        println!(
            "  {:<8} {}",
            slot.label(),
            item.map(|item| item.as_str()).unwrap_or("-")
        );
    }

    if outcome.components.is_empty() {
        println!("\nScore components: none");
    } else {
        println!("\nScore components");
        for component in &outcome.components {
            let source = match component.source {
                ScoreSource::Tier { points } => format!("tier {points}"),
                ScoreSource::Penalty => "penalty".to_string(),
                ScoreSource::SetBonus => "set bonus".to_string(),
            };
            println!("  {:+} ({}): {}", component.points, source, component.notes);
        }
    }

    println!("\nVerdict: {}", outcome.summary());
}

pub(crate) fn run_classes() {
    println!("Exalted Lost Halls point requirements");
    for (class, required) in exalted_thresholds() {
        println!("  {:<12} {}", class.label(), required);
    }
}
