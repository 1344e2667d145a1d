//! The single answer to "may this player act right now?".
//!
//! Every other module asks this predicate instead of comparing statuses
//! itself.

use super::entities::{Player, PlayerStatus};

/// Return whether the player may take a betting action.
#[must_use]
pub fn can_act(player: &Player) -> bool {
    !matches!(
        player.status,
        PlayerStatus::Folded | PlayerStatus::Out | PlayerStatus::AllIn
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_act_by_status() {
        let player = Player::new(1, 0, 100);
        let cases = [
            (PlayerStatus::Active, true),
            (PlayerStatus::Sitting, true),
            (PlayerStatus::Folded, false),
            (PlayerStatus::AllIn, false),
            (PlayerStatus::Out, false),
        ];
        for (status, expected) in cases {
            assert_eq!(
                can_act(&player.clone().with_status(status)),
                expected,
                "status {status}"
            );
        }
    }

    #[test]
    fn test_player_method_delegates() {
        let player = Player::new(1, 0, 0).with_status(PlayerStatus::AllIn);
        assert_eq!(player.can_act(), can_act(&player));
    }
}
