use std::time::Duration;

use behavior_tree::{Behavior, State};
use gameplay::plays::test_move_sequence::WAYPOINTS;
use gameplay::{Driver, MoveParams, Point, Robot, Status, TestMoveSequence, World};

const ROBOT: u8 = 0;

fn driver(max_speed: f32, params: MoveParams, continuous: bool) -> Driver {
    let world = World::new(max_speed).with_robot(ROBOT, Point::ORIGIN);
    let play =
        TestMoveSequence::with_options(Robot::new(ROBOT), &WAYPOINTS, params, continuous).unwrap();
    Driver::new(play, world, Duration::from_secs(1))
}

fn run_until_laps(driver: &mut Driver, laps: u64) {
    for _ in 0..100 {
        if driver.laps() >= laps {
            return;
        }
        assert_eq!(driver.step().unwrap(), Status::Running);
    }
    panic!("sequence did not complete {laps} laps");
}

#[test]
fn robot_visits_every_waypoint_then_starts_over() {
    // Fast enough to reach any waypoint within one step.
    let mut driver = driver(100.0, MoveParams::default(), true);

    let mut visited = Vec::new();
    while driver.laps() == 0 {
        assert_eq!(driver.step().unwrap(), Status::Running);
        visited.push(driver.world().position(ROBOT).unwrap());
        assert!(driver.ticks() < 100);
    }
    visited.dedup();
    assert_eq!(visited, WAYPOINTS.to_vec());

    // One tick per waypoint to start moving, one to see the last arrival,
    // one for the sequence itself to complete.
    assert_eq!(driver.ticks(), 6);

    driver.step().unwrap();
    assert_eq!(driver.world().position(ROBOT), Some(WAYPOINTS[0]));
    assert_eq!(
        driver.play().sequence().unwrap().state(),
        State::Running
    );

    run_until_laps(&mut driver, 2);
    assert_eq!(driver.ticks(), 12);
    assert_eq!(driver.play().state(), State::Running);
}

#[test]
fn one_shot_play_finishes_after_a_single_lap() {
    let mut driver = driver(100.0, MoveParams::default(), false);

    let mut status = Status::Running;
    while status == Status::Running {
        status = driver.step().unwrap();
        assert!(driver.ticks() < 100);
    }
    assert_eq!(status, Status::Finished(State::Completed));
    assert_eq!(driver.laps(), 1);
    assert_eq!(driver.ticks(), 7);
}

#[test]
fn timed_out_move_fails_the_lap_but_not_the_play() {
    let params = MoveParams {
        timeout_ticks: Some(3),
        ..MoveParams::default()
    };
    let mut driver = driver(0.1, params, true);

    for _ in 0..10 {
        assert_eq!(driver.step().unwrap(), Status::Running);
    }
    assert!(driver.play().sequence().unwrap().has_failed());
    assert_eq!(driver.play().state(), State::Running);
    assert_eq!(driver.laps(), 0);
}

#[test]
fn tree_dump_reflects_progress() {
    let mut driver = driver(100.0, MoveParams::default(), true);
    driver.step().unwrap();
    driver.step().unwrap();

    let tree = driver.describe();
    assert!(tree.starts_with("test move sequence: running\n"));
    assert!(tree.contains("    move (0, 1.5): completed\n"));
    assert!(tree.contains("    move (2, 0): running\n"));
    assert!(tree.contains("    move (0, 3): start\n"));
}
