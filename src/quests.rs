//! Quest tracking: the prerequisite-gated state machine per character.
//!
//! A quest's state is computed from the character's sets and the catalog;
//! only the active and completed sets are stored.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::character::Character;
use crate::error::{GameError, GameResult};
use crate::game_data::{QuestCatalog, QuestRecord};
use crate::progression;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestStatus {
    /// Prerequisite unmet or level too low.
    Locked,
    Available,
    Active,
    Completed,
}

/// Experience and gold granted on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestReward {
    pub xp: u64,
    pub gold: u32,
}

/// Computes the state of one quest for this character.
pub fn quest_status(character: &Character, quest: &QuestRecord) -> QuestStatus {
    if character.completed_quests.contains(&quest.id) {
        return QuestStatus::Completed;
    }
    if character.active_quests.contains(&quest.id) {
        return QuestStatus::Active;
    }
    if requirements_unmet(character, quest).is_some() {
        QuestStatus::Locked
    } else {
        QuestStatus::Available
    }
}

/// All quests currently available to this character, sorted by id.
pub fn available_quests<'a>(
    character: &Character,
    quests: &'a QuestCatalog,
) -> Vec<&'a QuestRecord> {
    quests
        .values()
        .filter(|quest| quest_status(character, quest) == QuestStatus::Available)
        .collect()
}

/// Moves an available quest into the active set.
pub fn accept_quest(
    character: &mut Character,
    quest_id: &str,
    quests: &QuestCatalog,
) -> GameResult<()> {
    let quest = quests
        .get(quest_id)
        .ok_or_else(|| GameError::QuestNotFound(quest_id.to_string()))?;

    if character.completed_quests.contains(&quest.id) {
        return Err(GameError::AlreadyCompleted(quest.id.clone()));
    }
    if character.active_quests.contains(&quest.id) {
        return Err(GameError::RequirementsNotMet {
            id: quest.id.clone(),
            reason: "quest is already active".to_string(),
        });
    }
    if let Some(reason) = requirements_unmet(character, quest) {
        return Err(GameError::RequirementsNotMet {
            id: quest.id.clone(),
            reason,
        });
    }

    character.active_quests.push(quest.id.clone());
    debug!(quest = quest_id, "quest accepted");
    Ok(())
}

/// Completes an active quest and grants its rewards.
///
/// Rewards flow through the progression paths, so completion can trigger
/// level-ups. The liveness check runs before any mutation: a dead character
/// fails `CharacterDead` with the quest still active.
pub fn complete_quest(
    character: &mut Character,
    quest_id: &str,
    quests: &QuestCatalog,
) -> GameResult<QuestReward> {
    let quest = quests
        .get(quest_id)
        .ok_or_else(|| GameError::QuestNotFound(quest_id.to_string()))?;

    let position = character
        .active_quests
        .iter()
        .position(|id| id == &quest.id)
        .ok_or_else(|| GameError::QuestNotActive(quest.id.clone()))?;
    if character.is_dead() {
        return Err(GameError::CharacterDead(character.name.clone()));
    }

    character.active_quests.remove(position);
    character.completed_quests.push(quest.id.clone());

    progression::gain_experience(character, quest.reward_xp)?;
    progression::add_gold(character, i64::from(quest.reward_gold))?;

    debug!(
        quest = quest_id,
        xp = quest.reward_xp,
        gold = quest.reward_gold,
        "quest completed"
    );
    Ok(QuestReward {
        xp: quest.reward_xp,
        gold: quest.reward_gold,
    })
}

/// Moves an active quest back to available (not completed).
pub fn abandon_quest(character: &mut Character, quest_id: &str) -> GameResult<()> {
    let position = character
        .active_quests
        .iter()
        .position(|id| id == quest_id)
        .ok_or_else(|| GameError::QuestNotActive(quest_id.to_string()))?;
    character.active_quests.remove(position);
    debug!(quest = quest_id, "quest abandoned");
    Ok(())
}

/// Returns why the quest cannot be accepted, or `None` when it can.
fn requirements_unmet(character: &Character, quest: &QuestRecord) -> Option<String> {
    if character.level < quest.required_level {
        return Some(format!(
            "requires level {}, character is level {}",
            quest.required_level, character.level
        ));
    }
    if let Some(prereq) = &quest.prerequisite {
        if !character.completed_quests.contains(prereq) {
            return Some(format!("prerequisite quest '{prereq}' not completed"));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;

    fn quest(id: &str, required_level: u32, prerequisite: Option<&str>) -> QuestRecord {
        QuestRecord {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            reward_xp: 50,
            reward_gold: 20,
            required_level,
            prerequisite: prerequisite.map(str::to_string),
        }
    }

    fn catalog(records: &[QuestRecord]) -> QuestCatalog {
        records
            .iter()
            .map(|q| (q.id.clone(), q.clone()))
            .collect()
    }

    fn hero() -> Character {
        Character::create("Hero", CharacterClass::Rogue)
    }

    #[test]
    fn test_accept_available_quest() {
        let mut c = hero();
        let quests = catalog(&[quest("intro", 1, None)]);
        accept_quest(&mut c, "intro", &quests).unwrap();
        assert_eq!(c.active_quests, vec!["intro"]);
    }

    #[test]
    fn test_accept_unknown_quest_fails() {
        let mut c = hero();
        let quests = QuestCatalog::new();
        let err = accept_quest(&mut c, "ghost", &quests).unwrap_err();
        assert_eq!(err, GameError::QuestNotFound("ghost".to_string()));
    }

    #[test]
    fn test_accept_underleveled_fails() {
        let mut c = hero();
        let quests = catalog(&[quest("elite", 5, None)]);
        let err = accept_quest(&mut c, "elite", &quests).unwrap_err();
        assert!(matches!(err, GameError::RequirementsNotMet { .. }));
        assert!(c.active_quests.is_empty());
    }

    #[test]
    fn test_accept_with_unmet_prerequisite_fails() {
        let mut c = hero();
        let quests = catalog(&[quest("intro", 1, None), quest("sequel", 1, Some("intro"))]);
        let err = accept_quest(&mut c, "sequel", &quests).unwrap_err();
        assert!(matches!(err, GameError::RequirementsNotMet { .. }));
    }

    #[test]
    fn test_accept_after_completion_fails() {
        let mut c = hero();
        let quests = catalog(&[quest("intro", 1, None)]);
        accept_quest(&mut c, "intro", &quests).unwrap();
        complete_quest(&mut c, "intro", &quests).unwrap();

        let err = accept_quest(&mut c, "intro", &quests).unwrap_err();
        assert_eq!(err, GameError::AlreadyCompleted("intro".to_string()));
    }

    #[test]
    fn test_accept_already_active_fails() {
        let mut c = hero();
        let quests = catalog(&[quest("intro", 1, None)]);
        accept_quest(&mut c, "intro", &quests).unwrap();
        let err = accept_quest(&mut c, "intro", &quests).unwrap_err();
        assert!(matches!(err, GameError::RequirementsNotMet { .. }));
        assert_eq!(c.active_quests.len(), 1);
    }

    #[test]
    fn test_complete_grants_rewards() {
        let mut c = hero();
        let quests = catalog(&[quest("intro", 1, None)]);
        accept_quest(&mut c, "intro", &quests).unwrap();

        let reward = complete_quest(&mut c, "intro", &quests).unwrap();
        assert_eq!(reward, QuestReward { xp: 50, gold: 20 });
        assert_eq!(c.experience, 50);
        assert_eq!(c.gold, 120);
        assert!(c.active_quests.is_empty());
        assert_eq!(c.completed_quests, vec!["intro"]);
    }

    #[test]
    fn test_complete_inactive_quest_fails() {
        let mut c = hero();
        let quests = catalog(&[quest("intro", 1, None)]);
        let err = complete_quest(&mut c, "intro", &quests).unwrap_err();
        assert_eq!(err, GameError::QuestNotActive("intro".to_string()));
    }

    #[test]
    fn test_complete_while_dead_changes_nothing() {
        let mut c = hero();
        let quests = catalog(&[quest("intro", 1, None)]);
        accept_quest(&mut c, "intro", &quests).unwrap();
        c.health = 0;

        let err = complete_quest(&mut c, "intro", &quests).unwrap_err();
        assert!(matches!(err, GameError::CharacterDead(_)));
        assert_eq!(c.active_quests, vec!["intro"], "quest stays active");
        assert!(c.completed_quests.is_empty());
        assert_eq!(c.experience, 0);
    }

    #[test]
    fn test_abandon_returns_quest_to_available() {
        let mut c = hero();
        let quests = catalog(&[quest("intro", 1, None)]);
        accept_quest(&mut c, "intro", &quests).unwrap();
        abandon_quest(&mut c, "intro").unwrap();

        assert!(c.active_quests.is_empty());
        assert_eq!(
            quest_status(&c, &quests["intro"]),
            QuestStatus::Available,
            "abandoned quest is available again, not completed"
        );
    }

    #[test]
    fn test_abandon_inactive_fails() {
        let mut c = hero();
        let err = abandon_quest(&mut c, "intro").unwrap_err();
        assert_eq!(err, GameError::QuestNotActive("intro".to_string()));
    }

    #[test]
    fn test_status_transitions_across_a_chain() {
        let mut c = hero();
        let quests = catalog(&[quest("intro", 1, None), quest("sequel", 1, Some("intro"))]);

        assert_eq!(quest_status(&c, &quests["intro"]), QuestStatus::Available);
        assert_eq!(quest_status(&c, &quests["sequel"]), QuestStatus::Locked);

        accept_quest(&mut c, "intro", &quests).unwrap();
        assert_eq!(quest_status(&c, &quests["intro"]), QuestStatus::Active);

        complete_quest(&mut c, "intro", &quests).unwrap();
        assert_eq!(quest_status(&c, &quests["intro"]), QuestStatus::Completed);
        assert_eq!(quest_status(&c, &quests["sequel"]), QuestStatus::Available);
    }

    #[test]
    fn test_available_quests_is_sorted_and_filtered() {
        let mut c = hero();
        let quests = catalog(&[
            quest("b_quest", 1, None),
            quest("a_quest", 1, None),
            quest("locked", 9, None),
        ]);
        accept_quest(&mut c, "b_quest", &quests).unwrap();

        let available = available_quests(&c, &quests);
        let ids: Vec<&str> = available.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["a_quest"]);
    }
}
