//! Field of view by recursive shadowcasting

use crate::dungeon::{Grid, GridPosition};

// Coordinate transforms for the eight octants: xx, xy, yx, yy per column.
const MULTIPLIERS: [[i32; 8]; 4] = [
    [1, 0, 0, -1, -1, 0, 0, 1],
    [0, 1, -1, 0, 0, -1, 1, 0],
    [0, 1, 1, 0, 0, -1, -1, 0],
    [1, 0, 0, 1, -1, 0, 0, -1],
];

#[derive(Clone, Copy)]
struct Octant {
    xx: i32,
    xy: i32,
    yx: i32,
    yy: i32,
}

/// Recompute visibility from `viewer`.
///
/// Clears every visible flag, marks the viewer's own tile, then sweeps all
/// eight octants. Tiles within Euclidean distance `radius` that are not in
/// shadow become visible and explored. Blocking tiles are themselves lit.
/// A negative radius counts as zero; radii past the grid's extent are cut
/// to it.
pub fn calculate_fov(grid: &mut Grid, viewer: GridPosition, radius: i32) {
    grid.clear_visible();
    if !grid.in_bounds(viewer.x, viewer.y) {
        return;
    }
    grid.set_visible(viewer.x, viewer.y);
    let radius = radius.clamp(0, grid.width() + grid.height());

    for oct in 0..8 {
        let octant = Octant {
            xx: MULTIPLIERS[0][oct],
            xy: MULTIPLIERS[1][oct],
            yx: MULTIPLIERS[2][oct],
            yy: MULTIPLIERS[3][oct],
        };
        cast_light(grid, viewer, radius, 1, 1.0, 0.0, octant);
    }
}

fn cast_light(
    grid: &mut Grid,
    origin: GridPosition,
    radius: i32,
    row: i32,
    mut start: f32,
    end: f32,
    oct: Octant,
) {
    if start < end {
        return;
    }
    let radius_sq = radius * radius;
    let mut new_start = start;

    for j in row..=radius {
        let dy = -j;
        let mut blocked = false;

        for dx in -j..=0 {
            let x = origin.x + dx * oct.xx + dy * oct.xy;
            let y = origin.y + dx * oct.yx + dy * oct.yy;
            let l_slope = (dx as f32 - 0.5) / (dy as f32 + 0.5);
            let r_slope = (dx as f32 + 0.5) / (dy as f32 - 0.5);

            if start < r_slope {
                continue;
            }
            if end > l_slope {
                break;
            }

            if dx * dx + dy * dy <= radius_sq {
                grid.set_visible(x, y);
            }

            let opaque = grid.blocks_vision(x, y);
            if blocked {
                if opaque {
                    new_start = r_slope;
                    continue;
                }
                blocked = false;
                start = new_start;
            } else if opaque && j < radius {
                blocked = true;
                cast_light(grid, origin, radius, j + 1, start, l_slope, oct);
                new_start = r_slope;
            }
        }

        if blocked {
            break;
        }
    }
}
