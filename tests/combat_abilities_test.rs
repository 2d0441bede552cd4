//! Integration test: step-wise combat and class abilities under a seeded RNG.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use chronicles::combat::{use_special_ability, AbilityOutcome, Battle, Enemy, EnemyKind, Winner};
use chronicles::{Character, CharacterClass, GameError};

// =========================================================================
// Step-wise battle driving, the way an interactive caller would
// =========================================================================

#[test]
fn test_menu_driven_battle_with_specials() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut hero = Character::create("Magnus", CharacterClass::Mage);
    let mut battle = Battle::new(&mut hero, Enemy::spawn(EnemyKind::Goblin));
    battle.begin().unwrap();

    // Fireball twice: 40 magical damage each clears the goblin's 50 HP.
    let first = battle.player_special(&mut rng).unwrap();
    assert!(first.is_none());
    assert_eq!(battle.enemy().health, 10);

    battle.enemy_attack().unwrap();

    let second = battle.player_special(&mut rng).unwrap().unwrap();
    assert_eq!(second.winner, Winner::Player);
    assert!(!battle.is_active());

    assert_eq!(hero.experience, 25);
    assert_eq!(hero.gold, 110);
}

#[test]
fn test_finished_battle_rejects_further_actions() {
    let mut hero = Character::create("Thorin", CharacterClass::Warrior);
    let mut battle = Battle::new(&mut hero, Enemy::spawn(EnemyKind::Goblin));
    battle.start().unwrap();

    assert_eq!(
        battle.player_attack().unwrap_err(),
        GameError::CombatNotActive
    );
    assert_eq!(battle.enemy_attack().unwrap_err(), GameError::CombatNotActive);
}

// =========================================================================
// Ability probabilities under a fixed seed
// =========================================================================

#[test]
fn test_rogue_crit_rate_is_near_half() {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    let trials = 2000;
    let mut hits = 0;
    for _ in 0..trials {
        let mut rogue = Character::create("Shade", CharacterClass::Rogue);
        let mut dummy = Enemy::spawn(EnemyKind::Dragon);
        if matches!(
            use_special_ability(&mut rogue, &mut dummy, &mut rng),
            AbilityOutcome::Damage { .. }
        ) {
            hits += 1;
        }
    }
    // 50% with a generous margin for the fixed seed.
    assert!(
        (800..=1200).contains(&hits),
        "expected ~50% crit rate, got {hits}/{trials}"
    );
}

#[test]
fn test_escape_rate_is_near_half() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let trials = 2000;
    let mut escapes = 0;
    for _ in 0..trials {
        let mut hero = Character::create("Swift", CharacterClass::Rogue);
        let mut battle = Battle::new(&mut hero, Enemy::spawn(EnemyKind::Goblin));
        battle.begin().unwrap();
        if battle.attempt_escape(&mut rng).unwrap().is_some() {
            escapes += 1;
        }
    }
    assert!(
        (800..=1200).contains(&escapes),
        "expected ~50% escape rate, got {escapes}/{trials}"
    );
}

#[test]
fn test_same_seed_reproduces_the_same_ability_sequence() {
    let run = |seed: u64| -> Vec<AbilityOutcome> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..32)
            .map(|_| {
                let mut rogue = Character::create("Shade", CharacterClass::Rogue);
                let mut dummy = Enemy::spawn(EnemyKind::Dragon);
                use_special_ability(&mut rogue, &mut dummy, &mut rng)
            })
            .collect()
    };
    assert_eq!(run(7), run(7), "saved-game reproducibility depends on this");
    assert_ne!(run(7), run(8), "different seeds diverge somewhere in 32 rolls");
}

// =========================================================================
// Cleric sustain: healing mid-battle keeps the fight winnable
// =========================================================================

#[test]
fn test_cleric_outlasts_an_orc_with_heals() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut cleric = Character::create("Lumen", CharacterClass::Cleric);
    let mut battle = Battle::new(&mut cleric, Enemy::spawn(EnemyKind::Orc));
    battle.begin().unwrap();

    // Orc hits for 12 - 10/4 = 10; the 30-point heal more than covers two
    // rounds of chip damage, so alternating heal and attack cannot lose.
    let outcome = loop {
        let low_health = battle.character().health < 40;
        let result = if low_health {
            battle.player_special(&mut rng).unwrap()
        } else {
            battle.player_attack().unwrap()
        };
        if let Some(outcome) = result {
            break outcome;
        }
        if let Some(outcome) = battle.enemy_attack().unwrap() {
            break outcome;
        }
    };

    assert_eq!(outcome.winner, Winner::Player);
    assert_eq!(cleric.experience, 50);
}
