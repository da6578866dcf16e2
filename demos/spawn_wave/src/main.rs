//! spawn_wave — a squad commander spawns a wave of grunts.
//!
//! The commander's flow asset lives on its controller.  Every spawned grunt
//! gets a blackboard injected and configured with a role from a reshuffled
//! pool, then the commander branches on its own blackboard and rolls for
//! the wave's tactic.
//!
//! Usage: `spawn_wave [config.toml]`.  The optional file holds a
//! `FlowConfig`; any field it omits keeps its default.  Set `RUST_LOG` to
//! change verbosity, e.g. `RUST_LOG=af_world=debug`.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use af_blackboard::{KeyType, SchemaBuilder, TypeRegistry, builtin};
use af_core::{ActorId, FlowConfig, Name, SchemaId};
use af_entry::{EntryValue, PinMap, PinSource, PinValue};
use af_flow::{
    AiFlowAsset, AssignmentMethod, BlackboardOption, CompareBlackboardValue, CompareOperator,
    ConfigureSpawnedActorBlackboard, EnsureActorHasBlackboard, FlowContext, FlowNode, FlowNodeAddOn, FlowPredicate,
    GetBlackboardValues, INPUT_PIN, RollGuaranteed, RollWeighted, SPECIFIC_ACTOR_PIN, SetBlackboardValuesAddOn,
    WeightedOption, execute,
};
use af_world::{ActorKind, InjectRule, SearchRule, WorldBuilder};

// ── Constants ─────────────────────────────────────────────────────────────────

const WAVE_SIZE:       usize = 6;
const TACTIC_ROLLS:    usize = 5;
const TACTIC_SEED:     u32   = 3;
const BREACH_ATTEMPTS: u32   = 4;

fn load_config(path: Option<&Path>) -> Result<FlowConfig> {
    let Some(path) = path else {
        return Ok(FlowConfig { seed: 7, ambient_seed: Some(42), ..FlowConfig::default() });
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args().nth(1);
    let config = load_config(config_path.as_deref().map(Path::new))?;
    info!(seed = config.seed, ambient_seed = ?config.ambient_seed, "loaded flow config");

    // ── Types and schemas ────────────────────────────────────────────────────

    let mut registry = TypeRegistry::new();
    let bb_class = registry.add_class("AIBlackboardComponent", builtin::BLACKBOARD_COMPONENT, false);

    let base = SchemaBuilder::new(SchemaId(0), "BB_Base")
        .key("SelfActor", KeyType::Object { base_class: builtin::ACTOR })
        .key("Alert", KeyType::Bool)
        .build()?;
    let grunt_schema = SchemaBuilder::new(SchemaId(1), "BB_Grunt")
        .parent(&base)
        .key("Health", KeyType::Float)
        .key("Squad", KeyType::Int)
        .key("Role", KeyType::String)
        .build()?;

    // ── World ────────────────────────────────────────────────────────────────

    let mut world = WorldBuilder::new("Outpost").registry(registry).with_game_state("GameState").build()?;
    let commander = world.spawn_actor(ActorKind::Pawn, "Commander")?;
    let commander_ai = world.spawn_actor(ActorKind::Controller, "CommanderAI")?;
    world.possess(commander_ai, commander)?;

    let mut asset = AiFlowAsset::new("AF_Commander", config.clone())
        .with_schema(grunt_schema)
        .with_component_class(bb_class);
    asset.validate(world.registry())?;
    let store = asset.initialize(&mut world, commander_ai).context("commander blackboard")?;
    info!(store = %world.hosted(store).map(|h| h.name.clone()).unwrap_or_default(), "flow asset initialized");

    let mut ambient = config.ambient_rng();

    // ── Spawn the wave ───────────────────────────────────────────────────────

    let grunts: Vec<ActorId> = (0..WAVE_SIZE)
        .map(|i| world.spawn_actor(ActorKind::Pawn, format!("Grunt_{i}")))
        .collect::<Result<_, _>>()?;

    let roles = ["Rifleman", "Medic", "Sapper"]
        .iter()
        .enumerate()
        .map(|(squad, role)| {
            BlackboardOption::new(vec![
                EntryValue::string("Role", *role),
                EntryValue::int("Squad", i32::try_from(squad).unwrap_or(0)),
            ])
        })
        .collect();
    let mut configure = ConfigureSpawnedActorBlackboard::new(vec![EntryValue::float("Health", 100.0)], roles);
    configure.inject_rule = InjectRule::InjectOntoActorIfMissing;
    configure.assignment_method = AssignmentMethod::ShuffledWithReshuffling;

    let mut announce = SetBlackboardValuesAddOn::new(vec![EntryValue::bool("Alert", true)]);
    let mut ensure = EnsureActorHasBlackboard::new(SearchRule::ActorAndController, InjectRule::DoNotInjectIfMissing);

    {
        let pins = PinMap::new();
        let mut ctx = FlowContext::new(&mut world, &asset, &mut ambient, &pins);
        info!("configure add-on:\n{}", configure.node_config_text(ctx.registry()));

        announce.on_parent_execute(&mut ctx, &Name::from(INPUT_PIN));
        for &grunt in &grunts {
            configure.finished_spawning_actor(&mut ctx, grunt);
        }

        // No actor pin, so the flow owner is checked.
        let signals = execute(&mut ensure, &mut ctx, &Name::from(INPUT_PIN));
        info!(?signals, "ensured commander blackboard");

        // ── Branch on the commander's blackboard ─────────────────────────────

        let alerted = CompareBlackboardValue::literal("Alert", CompareOperator::Equal, EntryValue::bool("", true));
        info!(
            predicate = %alerted.title(ctx.registry()),
            result = alerted.evaluate_predicate(&ctx),
            "commander check"
        );

        let mut tactic = RollWeighted::new(
            vec![WeightedOption::new("Flank", 3), WeightedOption::new("Hold", 2), WeightedOption::new("Charge", 1)],
            TACTIC_SEED,
        );
        tactic.on_activate(&mut ctx);
        for round in 0..TACTIC_ROLLS {
            let signals = execute(&mut tactic, &mut ctx, &Name::from(INPUT_PIN));
            let chosen = signals.first().and_then(|s| s.output()).cloned().unwrap_or_default();
            info!(round, tactic = %chosen, "tactic rolled");
        }

        let mut breach = RollGuaranteed::new(BREACH_ATTEMPTS, true);
        for attempt in 1..=BREACH_ATTEMPTS {
            let chance = breach.next_success_chance();
            let signals = execute(&mut breach, &mut ctx, &Name::from(INPUT_PIN));
            let out = signals.first().and_then(|s| s.output()).cloned().unwrap_or_default();
            info!(attempt, chance, output = %out, "breach attempt");
            if out == RollGuaranteed::GUARANTEED_OUT {
                break;
            }
        }
    }

    // ── Read back each grunt ─────────────────────────────────────────────────

    let reader = GetBlackboardValues::new(["Role", "Squad", "Health"]);
    for &grunt in &grunts {
        let pins = PinMap::new().with(SPECIFIC_ACTOR_PIN, PinValue::Object(world.actor_object(grunt)));
        let ctx = FlowContext::new(&mut world, &asset, &mut ambient, &pins);
        let values = reader.outputs(&ctx);
        let role = values.resolve_pin(&Name::from("Role"));
        let squad = values.resolve_pin(&Name::from("Squad"));
        info!(grunt = %ctx.world.actor_name(grunt), ?role, ?squad, "grunt configured");
    }

    // ── Casualties and teardown ──────────────────────────────────────────────

    if let Some(&fallen) = grunts.first() {
        world.destroy_actor(fallen);
    }
    let released = configure.injection().released_actors();
    info!(count = released.len(), "grunts released from monitoring");

    {
        let pins = PinMap::new();
        let mut ctx = FlowContext::new(&mut world, &asset, &mut ambient, &pins);
        configure.deinitialize_instance(&mut ctx);
        ensure.deinitialize_instance(&mut ctx);
    }
    asset.deinitialize(&mut world);

    let leftover = grunts.iter().filter(|g| !world.stores_on(**g).is_empty()).count();
    if leftover > 0 {
        warn!(leftover, "grunts still carry blackboards after teardown");
    }
    info!("done");
    Ok(())
}
