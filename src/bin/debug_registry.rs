//! Debug script to print the attack type registry, optionally merged with a build's extras

use std::env;
use vitality_sim::attack::AttackRegistry;
use vitality_sim::config::BuildConfig;

fn main() {
    let args: Vec<String> = env::args().collect();

    let registry = if args.len() > 1 {
        match BuildConfig::from_file(&args[1]).and_then(|c| c.registry()) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        AttackRegistry::standard()
    };

    println!("\n=== ATTACK TYPES ({}) ===", registry.len());
    println!(
        "{:<20} {:>5} {:>5} {:>5} {:>5} {:>7} {:>5}",
        "name", "tier", "acc", "dmg", "area", "direct", "base"
    );
    for t in registry.iter() {
        println!(
            "{:<20} {:>5} {:>5} {:>5} {:>5} {:>7} {:>5}",
            t.name,
            t.tier_scaling,
            t.accuracy_mod,
            t.damage_mod,
            t.is_area,
            t.is_direct,
            t.direct_damage_base
        );
    }
}
