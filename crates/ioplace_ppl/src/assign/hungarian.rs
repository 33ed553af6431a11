//! Minimum-cost bipartite matching (Hungarian algorithm, potentials form).
//!
//! Runs in `O(n^2 m)` for `n` rows and `m >= n` columns.

use ioplace_common::{InternalError, IoplaceResult};

const INF: i64 = i64::MAX / 4;

/// Matches every row of `cost` to a distinct column minimizing the total.
///
/// Returns the column chosen for each row. Among equal-cost columns the
/// scan keeps the lowest index.
pub(crate) fn min_cost_matching(cost: &[Vec<i64>]) -> IoplaceResult<Vec<usize>> {
    let n = cost.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    let m = cost[0].len();
    if cost.iter().any(|row| row.len() != m) {
        return Err(InternalError::new("cost matrix rows differ in length"));
    }
    if n > m {
        return Err(InternalError::new(format!(
            "cannot match {n} rows to {m} columns"
        )));
    }

    // 1-based; column 0 is the virtual start of each augmenting path.
    let mut u = vec![0i64; n + 1];
    let mut v = vec![0i64; m + 1];
    let mut owner = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];

    for row in 1..=n {
        owner[0] = row;
        let mut j0 = 0;
        let mut minv = vec![INF; m + 1];
        let mut used = vec![false; m + 1];
        loop {
            used[j0] = true;
            let i0 = owner[j0];
            let mut delta = INF;
            let mut j1 = 0;
            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let reduced = cost[i0 - 1][j - 1] - u[i0] - v[j];
                if reduced < minv[j] {
                    minv[j] = reduced;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }
            for j in 0..=m {
                if used[j] {
                    u[owner[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if owner[j0] == 0 {
                break;
            }
        }
        // Flip the augmenting path.
        while j0 != 0 {
            let prev = way[j0];
            owner[j0] = owner[prev];
            j0 = prev;
        }
    }

    let mut matching = vec![0usize; n];
    for j in 1..=m {
        if owner[j] != 0 {
            matching[owner[j] - 1] = j - 1;
        }
    }
    Ok(matching)
}
