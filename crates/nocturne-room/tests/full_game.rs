//! A complete game played through the registry and real room actors:
//! four players, a night kill, an investigation, a vote, town victory.

use std::collections::HashMap;
use std::time::Duration;

use nocturne_protocol::{
    ClientMessage, NightActionKind, Phase, PlayerHandle, Role, RoleQuota,
    ServerEvent, Winner,
};
use nocturne_room::{PlayerSender, SessionRegistry};
use tokio::sync::mpsc;

fn h(id: u64) -> PlayerHandle {
    PlayerHandle(id)
}

fn channel() -> (PlayerSender, mpsc::UnboundedReceiver<ServerEvent>) {
    mpsc::unbounded_channel()
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

fn drain(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Seats players 1..=4 as "p1".."p4" and starts with 1 killer + 1 seer.
/// Returns (registry, receivers by handle id, roles by handle id).
async fn started_game() -> (
    SessionRegistry,
    HashMap<u64, mpsc::UnboundedReceiver<ServerEvent>>,
    HashMap<u64, Role>,
) {
    let mut reg = SessionRegistry::new();
    let mut rxs = HashMap::new();

    let (tx, rx) = channel();
    let code = reg.create_room(h(1), "p1".into(), tx).await.unwrap();
    rxs.insert(1, rx);
    for i in 2..=4u64 {
        let (tx, rx) = channel();
        reg.join_room(&code, h(i), format!("p{i}"), tx).await.unwrap();
        rxs.insert(i, rx);
    }

    reg.route(
        h(1),
        ClientMessage::UpdateQuota {
            quota: RoleQuota { killer: 1, seer: 1, guardian: 0 },
        },
    )
    .await
    .unwrap();
    reg.route(h(1), ClientMessage::StartGame).await.unwrap();
    settle().await;

    // Each player's private role card is the only place roles appear.
    let mut roles = HashMap::new();
    for (id, rx) in &mut rxs {
        let events = drain(rx);
        let role = events
            .iter()
            .find_map(|e| match e {
                ServerEvent::RoleAssigned { role } => Some(*role),
                _ => None,
            })
            .expect("every player receives exactly their own role");
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, ServerEvent::RoleAssigned { .. }))
                .count(),
            1,
            "no player sees another player's role"
        );
        assert!(events.iter().any(|e| matches!(
            e,
            ServerEvent::PhaseChange { phase: Phase::Night, round: 1, .. }
        )));
        roles.insert(*id, role);
    }

    (reg, rxs, roles)
}

fn find(roles: &HashMap<u64, Role>, role: Role) -> Vec<u64> {
    let mut ids: Vec<u64> = roles
        .iter()
        .filter(|(_, r)| **r == role)
        .map(|(id, _)| *id)
        .collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn test_full_game_town_wins_over_the_wirelike_path() {
    let (mut reg, mut rxs, roles) = started_game().await;

    let killer = find(&roles, Role::Killer)[0];
    let seer = find(&roles, Role::Seer)[0];
    let villagers = find(&roles, Role::Villager);
    assert_eq!(villagers.len(), 2, "1 killer + 1 seer + 2 villagers");

    let victim = villagers[0];
    let killer_name = format!("p{killer}");
    let victim_name = format!("p{victim}");

    // Night 1: the seer probes the killer, the killer takes a villager.
    reg.route(
        h(seer),
        ClientMessage::NightAction {
            action: NightActionKind::Investigate,
            target: killer_name.clone(),
        },
    )
    .await
    .unwrap();
    reg.route(
        h(killer),
        ClientMessage::NightAction {
            action: NightActionKind::Kill,
            target: victim_name.clone(),
        },
    )
    .await
    .unwrap();
    settle().await;

    // The seer — and only the seer — learns the truth.
    for (id, rx) in &mut rxs {
        let events = drain(rx);
        let saw_investigation = events.iter().any(|e| {
            matches!(
                e,
                ServerEvent::InvestigationResult { target, is_killer: true }
                    if *target == killer_name
            )
        });
        assert_eq!(saw_investigation, *id == seer);

        // Everyone sees Day arrive with the victim named.
        assert!(
            events.iter().any(|e| matches!(
                e,
                ServerEvent::PhaseChange {
                    phase: Phase::Day,
                    round: 1,
                    narrative: Some(text),
                } if text.contains(&victim_name)
            )),
            "player {id} missed the day transition"
        );

        // The victim privately learns their own role.
        let saw_death = events
            .iter()
            .any(|e| matches!(e, ServerEvent::PlayerDied { .. }));
        assert_eq!(saw_death, *id == victim);
    }

    // Day → voting, on the host's word.
    reg.route(h(1), ClientMessage::StartVoting).await.unwrap();
    settle().await;

    // The three living players vote; the town converges on the killer.
    let living: Vec<u64> = (1..=4).filter(|id| *id != victim).collect();
    for voter in &living {
        let target = if *voter == killer {
            format!("p{seer}")
        } else {
            killer_name.clone()
        };
        reg.route(h(*voter), ClientMessage::CastVote { target })
            .await
            .unwrap();
    }
    settle().await;

    for (id, rx) in &mut rxs {
        let events = drain(rx);
        if *id == victim {
            // The dead spectate: broadcasts still arrive.
            assert!(!events.is_empty());
        }

        let tally = events.iter().find_map(|e| match e {
            ServerEvent::VotingResult { tally, narrative } => {
                Some((tally.clone(), narrative.clone()))
            }
            _ => None,
        });
        let (tally, narrative) = tally.expect("voting result broadcast");
        assert_eq!(tally[0].name, killer_name);
        assert_eq!(tally[0].votes, 2);
        assert!(narrative.contains("Killer"), "vote deaths reveal the role");

        let game_over = events.iter().find_map(|e| match e {
            ServerEvent::GameOver { winner, roster } => {
                Some((*winner, roster.clone()))
            }
            _ => None,
        });
        let (winner, roster) = game_over.expect("game over broadcast");
        assert_eq!(winner, Winner::Town);
        assert_eq!(roster.len(), 4);
        assert!(
            roster
                .iter()
                .any(|seat| seat.role == Role::Killer && !seat.alive)
        );
    }

    // The final results are delivered; the last detach retires the room.
    for id in 1..=4u64 {
        reg.leave(h(id)).await.unwrap();
    }
    assert_eq!(reg.room_count(), 0);
}

#[tokio::test]
async fn test_disconnect_mid_night_completes_the_round() {
    let (mut reg, mut rxs, roles) = started_game().await;

    let killer = find(&roles, Role::Killer)[0];
    let seer = find(&roles, Role::Seer)[0];
    let victim_name = format!("p{}", find(&roles, Role::Villager)[0]);

    reg.route(
        h(killer),
        ClientMessage::NightAction {
            action: NightActionKind::Kill,
            target: victim_name,
        },
    )
    .await
    .unwrap();
    settle().await;

    // Still night: the seer owes an action.
    let code = reg.room_of(h(killer)).unwrap().clone();
    assert_eq!(reg.room_info(&code).await.unwrap().phase, Phase::Night);

    // The seer walks out; the round must not wait on a dead line.
    reg.leave(h(seer)).await.unwrap();
    settle().await;

    assert_eq!(reg.room_info(&code).await.unwrap().phase, Phase::Day);
    // The killer is never the seer, so their channel saw the notice.
    let killer_events = drain(rxs.get_mut(&killer).unwrap());
    assert!(killer_events.iter().any(|e| matches!(
        e,
        ServerEvent::PlayerDisconnected { name } if *name == format!("p{seer}")
    )));
}
