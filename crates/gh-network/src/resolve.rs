//! Junction resolution: the explicit replacement for simultaneous
//! connection equations.
//!
//! Given every member's submitted flow and (optionally) driven potential for
//! the current step, [`resolve_members`] rewrites the member values so that
//! flows sum to zero and every member shares one potential.

use gh_core::Real;
use serde::{Deserialize, Serialize};

/// How a junction of more than two ports picks its shared potential when no
/// member is designated as the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PotentialPolicy {
    /// Plain mean of the candidate potentials.
    #[default]
    Unweighted,
    /// Mean weighted by `|flow|` after flow resolution.
    /// Falls back to the plain mean when every weight is zero.
    FlowWeighted,
}

/// Network-wide resolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolvePolicy {
    #[serde(default)]
    pub potential: PotentialPolicy,
}

/// Working copy of one member's per-step values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MemberState {
    pub potential: Real,
    pub flow: Real,
    pub submitted: bool,
    pub driven: bool,
}

/// Resolve flows then potentials in place.
///
/// `driver` indexes the designated authoritative member. Returns the shared
/// potential, or `None` for an empty junction. A single member is left as is.
pub(crate) fn resolve_members(
    members: &mut [MemberState],
    driver: Option<usize>,
    policy: ResolvePolicy,
) -> Option<Real> {
    match members.len() {
        0 => return None,
        1 => return Some(members[0].potential),
        _ => {}
    }

    balance_flows(members);

    let potential = match driver {
        Some(d) => members[d].potential,
        None if members.len() == 2 => {
            members
                .iter()
                .find(|m| m.driven)
                .unwrap_or(&members[0])
                .potential
        }
        None => average_potential(members, policy.potential),
    };

    for m in members.iter_mut() {
        m.potential = potential;
    }
    Some(potential)
}

fn balance_flows(members: &mut [MemberState]) {
    let free = members.iter().filter(|m| !m.submitted).count();
    if free > 0 {
        // Free members absorb the residual; one free member is a pass-through.
        let submitted: Real = members.iter().filter(|m| m.submitted).map(|m| m.flow).sum();
        let share = -submitted / free as Real;
        for m in members.iter_mut().filter(|m| !m.submitted) {
            m.flow = share;
        }
    } else if members.len() == 2 {
        let mean = 0.5 * (members[0].flow - members[1].flow);
        members[0].flow = mean;
        members[1].flow = -mean;
    } else {
        let correction = members.iter().map(|m| m.flow).sum::<Real>() / members.len() as Real;
        for m in members.iter_mut() {
            m.flow -= correction;
        }
    }
}

fn average_potential(members: &[MemberState], policy: PotentialPolicy) -> Real {
    let any_driven = members.iter().any(|m| m.driven);
    let candidates = || members.iter().filter(move |m| m.driven || !any_driven);

    let unweighted = || {
        let (sum, n) = candidates().fold((0.0, 0usize), |(s, n), m| (s + m.potential, n + 1));
        sum / n as Real
    };

    match policy {
        PotentialPolicy::Unweighted => unweighted(),
        PotentialPolicy::FlowWeighted => {
            let (weighted, total) = candidates().fold((0.0, 0.0), |(s, w), m| {
                (s + m.potential * m.flow.abs(), w + m.flow.abs())
            });
            if total > 0.0 {
                weighted / total
            } else {
                unweighted()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(potential: Real, flow: Option<Real>, driven: bool) -> MemberState {
        MemberState {
            potential,
            flow: flow.unwrap_or(0.0),
            submitted: flow.is_some(),
            driven,
        }
    }

    fn flow_sum(members: &[MemberState]) -> Real {
        members.iter().map(|m| m.flow).sum()
    }

    #[test]
    fn empty_and_single_are_untouched() {
        let mut empty: Vec<MemberState> = vec![];
        assert_eq!(resolve_members(&mut empty, None, ResolvePolicy::default()), None);

        let mut single = vec![member(300.0, Some(12.0), true)];
        assert_eq!(
            resolve_members(&mut single, None, ResolvePolicy::default()),
            Some(300.0)
        );
        assert_eq!(single[0].flow, 12.0);
    }

    #[test]
    fn two_submitted_flows_are_averaged() {
        let mut ms = vec![member(300.0, Some(10.0), false), member(290.0, Some(-6.0), false)];
        resolve_members(&mut ms, None, ResolvePolicy::default());
        assert_eq!(ms[0].flow, 8.0);
        assert_eq!(ms[1].flow, -8.0);
        // no driven member: first-connected wins
        assert_eq!(ms[0].potential, 300.0);
        assert_eq!(ms[1].potential, 300.0);
    }

    #[test]
    fn single_free_member_passes_through() {
        let mut ms = vec![member(290.0, Some(-25.0), false), member(310.0, None, true)];
        resolve_members(&mut ms, None, ResolvePolicy::default());
        assert_eq!(ms[1].flow, 25.0);
        assert_eq!(ms[0].potential, 310.0);
    }

    #[test]
    fn designated_driver_wins() {
        let mut ms = vec![
            member(280.0, Some(1.0), true),
            member(300.0, Some(2.0), true),
            member(320.0, None, false),
        ];
        resolve_members(&mut ms, Some(1), ResolvePolicy::default());
        assert!(ms.iter().all(|m| m.potential == 300.0));
        assert!(flow_sum(&ms).abs() < 1e-12);
    }

    #[test]
    fn residual_shared_equally_when_all_submitted() {
        let mut ms = vec![
            member(1.0, Some(3.0), false),
            member(2.0, Some(3.0), false),
            member(3.0, Some(3.0), false),
        ];
        let p = resolve_members(&mut ms, None, ResolvePolicy::default());
        assert_eq!(p, Some(2.0));
        for m in &ms {
            assert!(m.flow.abs() < 1e-12);
        }
    }

    #[test]
    fn average_only_over_driven_members() {
        let mut ms = vec![
            member(300.0, None, true),
            member(310.0, None, true),
            member(999.0, None, false),
        ];
        let p = resolve_members(&mut ms, None, ResolvePolicy::default());
        assert_eq!(p, Some(305.0));
    }

    #[test]
    fn flow_weighted_average() {
        let policy = ResolvePolicy {
            potential: PotentialPolicy::FlowWeighted,
        };
        let mut ms = vec![
            member(300.0, Some(30.0), false),
            member(200.0, Some(-10.0), false),
            member(100.0, Some(-20.0), false),
        ];
        let p = resolve_members(&mut ms, None, policy).unwrap();
        assert!((p - (300.0 * 30.0 + 200.0 * 10.0 + 100.0 * 20.0) / 60.0).abs() < 1e-9);
    }

    #[test]
    fn flow_weighted_falls_back_without_flow() {
        let policy = ResolvePolicy {
            potential: PotentialPolicy::FlowWeighted,
        };
        let mut ms = vec![
            member(300.0, None, false),
            member(200.0, None, false),
            member(100.0, None, false),
        ];
        assert_eq!(resolve_members(&mut ms, None, policy), Some(200.0));
    }
}
