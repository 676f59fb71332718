use delve_core::action::{ActionCommand, Direction};
use delve_core::options::GameOptions;
use delve_core::{GameLoop, GameLoopResult, GameRng};

const CARDINALS: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
];

// Random walk for up to `inputs` player decisions. Returns the number of
// inputs actually made.
fn random_walk(game: &mut GameLoop, rng: &mut GameRng, inputs: usize) -> usize {
    for made in 0..inputs {
        match game.run_until_input(10_000) {
            GameLoopResult::AwaitingInput => {
                let dir = *rng.choose(&CARDINALS).unwrap();
                assert!(game.submit_player_command(ActionCommand::step(dir)));
            }
            GameLoopResult::PlayerDied(_) | GameLoopResult::GameOver => return made,
            other => panic!("scheduler stalled: {other:?}"),
        }
    }
    inputs
}

fn check_consistency(game: &GameLoop) {
    let grid = game.grid();
    let reg = game.registry();
    for (id, actor) in reg.actors() {
        assert!(grid.in_bounds(actor.pos.x, actor.pos.y));
        assert_eq!(grid.at(actor.pos.x, actor.pos.y).occupant, Some(id), "{}", actor.name);
    }
    let occupied = grid.tiles().iter().filter(|t| t.occupant.is_some()).count();
    assert_eq!(occupied, reg.actor_count());
    for tile in grid.tiles() {
        if let Some(id) = tile.occupant {
            assert!(reg.contains(id));
        }
        if tile.visible {
            assert!(tile.explored);
        }
    }
}

#[test]
fn test_session_survives_random_play() {
    for seed in [1u64, 2, 3] {
        let mut game = GameLoop::new(GameOptions {
            base_seed: seed,
            ..GameOptions::default()
        })
        .unwrap();
        let mut rng = GameRng::new(seed);

        random_walk(&mut game, &mut rng, 300);
        check_consistency(&game);
        assert!(game.turn_count() > 0);
        assert!(game.messages().count() <= delve_core::MESSAGE_LOG_LEN);
    }
}

#[test]
fn test_sessions_replay_identically() {
    let play = || {
        let mut game = GameLoop::new(GameOptions {
            base_seed: 77,
            map_width: 60,
            map_height: 30,
            ..GameOptions::default()
        })
        .unwrap();
        let mut rng = GameRng::new(5);
        let inputs = random_walk(&mut game, &mut rng, 150);
        let actors: Vec<_> = game
            .registry()
            .actors()
            .map(|(_, a)| (a.name.clone(), a.pos, a.health))
            .collect();
        (inputs, game.turn_count(), actors, game.messages().map(String::from).collect::<Vec<_>>())
    };
    assert_eq!(play(), play());
}

#[test]
fn test_player_sees_around_start() {
    let game = GameLoop::new(GameOptions {
        base_seed: 8,
        view_radius: 5,
        ..GameOptions::default()
    })
    .unwrap();
    let pos = game.player_actor().unwrap().pos;
    let visible: Vec<_> = game
        .grid()
        .positions()
        .filter(|p| game.grid().at(p.x, p.y).visible)
        .collect();
    assert!(visible.len() > 1);
    assert!(visible.iter().all(|p| p.distance_sq(pos) <= 25));
}
