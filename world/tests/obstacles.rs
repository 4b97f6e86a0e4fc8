use lava_runner_core::{Obstacle, Vector};
use lava_runner_world::{query, Level};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const WIDTH: f32 = 12.0;
const HEIGHT: f32 = 8.0;

fn open_level() -> Level {
    let mut plan = vec![" ".repeat(WIDTH as usize); HEIGHT as usize];
    plan[3].replace_range(5..6, "@");
    Level::from_plan(plan.as_slice(), &mut ChaCha8Rng::seed_from_u64(3)).expect("valid plan")
}

fn walled_level() -> Level {
    let plan = ["x   x", "x ! x", "x @ x", "xxxxx"];
    Level::from_plan(&plan, &mut ChaCha8Rng::seed_from_u64(3)).expect("valid plan")
}

proptest! {
    #[test]
    fn open_space_has_no_obstacles(
        width in 0.1f32..3.0,
        height in 0.1f32..3.0,
        x_fraction in 0.0f32..1.0,
        y_fraction in 0.0f32..1.0,
    ) {
        let level = open_level();
        let x = x_fraction * (WIDTH - width - 0.001);
        let y = y_fraction * (HEIGHT - height - 0.001);
        let found = query::obstacle_at(&level, Vector::new(x, y), Vector::new(width, height));
        prop_assert_eq!(found, None);
    }

    #[test]
    fn leaving_through_the_bottom_is_lava(
        x_fraction in 0.0f32..1.0,
        overshoot in 0.01f32..4.0,
    ) {
        let level = open_level();
        let size = Vector::new(0.8, 1.5);
        let x = x_fraction * (WIDTH - size.x() - 0.001);
        let y = HEIGHT - size.y() + overshoot;
        let found = query::obstacle_at(&level, Vector::new(x, y), size);
        prop_assert_eq!(found, Some(Obstacle::Lava));
    }

    #[test]
    fn sides_and_top_win_over_the_bottom(
        outside in 0.01f32..4.0,
        overshoot in 0.01f32..4.0,
    ) {
        let level = open_level();
        let size = Vector::new(0.8, 1.5);
        let below = HEIGHT - size.y() + overshoot;

        let left = query::obstacle_at(&level, Vector::new(-outside, below), size);
        prop_assert_eq!(left, Some(Obstacle::Wall));

        let right = query::obstacle_at(
            &level,
            Vector::new(WIDTH - size.x() + outside, below),
            size,
        );
        prop_assert_eq!(right, Some(Obstacle::Wall));

        let above = query::obstacle_at(&level, Vector::new(1.0, -outside), size);
        prop_assert_eq!(above, Some(Obstacle::Wall));
    }
}

#[test]
fn straddling_boxes_claim_every_touched_cell() {
    let level = walled_level();

    // Fully inside the open column next to the lava cell.
    assert_eq!(
        query::obstacle_at(&level, Vector::new(1.0, 0.0), Vector::new(1.0, 1.0)),
        None
    );
    // A sliver over the boundary into column 2 reaches the lava on row 1.
    assert_eq!(
        query::obstacle_at(&level, Vector::new(1.05, 0.5), Vector::new(1.0, 1.0)),
        Some(Obstacle::Lava)
    );
    // Row-major scan finds the wall on row 0 before the lava on row 1.
    assert_eq!(
        query::obstacle_at(&level, Vector::new(0.5, 0.5), Vector::new(2.0, 1.0)),
        Some(Obstacle::Wall)
    );
    assert_eq!(
        query::obstacle_at(&level, Vector::new(1.0, 3.2), Vector::new(1.0, 0.5)),
        Some(Obstacle::Wall)
    );
}
