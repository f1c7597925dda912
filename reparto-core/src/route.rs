//! Ordered delivery routes.
//!
//! A [`Route`] always starts with a [`RouteRole::Start`] point, ends with a
//! [`RouteRole::End`] point and carries every intermediate stop in between.

use std::fmt;

use thiserror::Error;

use crate::{Address, GeoPoint, ResolvedAddress, haversine_km};

/// Position a point plays in a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RouteRole {
    /// Where the driver sets off.
    Start,
    /// A delivery stop.
    Intermediate,
    /// Where the driver finishes.
    End,
}

impl fmt::Display for RouteRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::Intermediate => "intermediate",
            Self::End => "end",
        })
    }
}

/// A resolved address with its role in the route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutePoint {
    /// Role of this point.
    pub role: RouteRole,
    /// The address as entered.
    pub address: Address,
    /// Resolved coordinate.
    pub location: GeoPoint,
}

impl RoutePoint {
    /// Attach a role to a resolved address.
    #[must_use]
    pub fn new(role: RouteRole, resolved: ResolvedAddress) -> Self {
        Self {
            role,
            address: resolved.address,
            location: resolved.location,
        }
    }
}

/// Errors returned by [`Route::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Fewer than two points were supplied.
    #[error("route needs at least a start and an end point, got {count}")]
    TooShort { count: usize },
    /// The point at `index` carries the wrong role for its position.
    #[error("point {index} has role {found}, expected {expected}")]
    MisplacedRole {
        index: usize,
        expected: RouteRole,
        found: RouteRole,
    },
}

/// An ordered visit sequence: start, intermediates, end.
///
/// # Examples
/// ```
/// use reparto_core::{Address, GeoPoint, ResolvedAddress, Route, RouteRole};
///
/// let stop = |text: &str, lat: f64| ResolvedAddress::new(Address::new(text), GeoPoint::new(lat, 0.0));
/// let route = Route::assemble(stop("Depot", 0.0), vec![stop("Shop", 0.1)], stop("Home", 0.2));
///
/// assert_eq!(route.len(), 3);
/// assert_eq!(route.start().role, RouteRole::Start);
/// assert_eq!(route.end().role, RouteRole::End);
/// assert_eq!(route.labelled(), ["1. Depot", "2. Shop", "3. Home"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Route {
    points: Vec<RoutePoint>,
}

impl Route {
    /// Validate the role layout of `points` and wrap them.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::TooShort`] for fewer than two points and
    /// [`RouteError::MisplacedRole`] when the first point is not the start,
    /// the last is not the end, or an inner point is not an intermediate.
    pub fn new(points: Vec<RoutePoint>) -> Result<Self, RouteError> {
        let count = points.len();
        if count < 2 {
            return Err(RouteError::TooShort { count });
        }
        let last = count - 1;
        for (index, point) in points.iter().enumerate() {
            let expected = match index {
                0 => RouteRole::Start,
                i if i == last => RouteRole::End,
                _ => RouteRole::Intermediate,
            };
            if point.role != expected {
                return Err(RouteError::MisplacedRole {
                    index,
                    expected,
                    found: point.role,
                });
            }
        }
        Ok(Self { points })
    }

    /// Build a route from already-ordered parts, assigning roles.
    #[must_use]
    pub fn assemble(
        start: ResolvedAddress,
        ordered: Vec<ResolvedAddress>,
        end: ResolvedAddress,
    ) -> Self {
        let mut points = Vec::with_capacity(ordered.len() + 2);
        points.push(RoutePoint::new(RouteRole::Start, start));
        points.extend(
            ordered
                .into_iter()
                .map(|stop| RoutePoint::new(RouteRole::Intermediate, stop)),
        );
        points.push(RoutePoint::new(RouteRole::End, end));
        Self { points }
    }

    /// All points in visiting order.
    #[must_use]
    pub fn points(&self) -> &[RoutePoint] {
        &self.points
    }

    /// Number of points including start and end.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; a route holds at least a start and an end.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The start point.
    #[must_use]
    pub fn start(&self) -> &RoutePoint {
        // Both constructors guarantee at least two points.
        &self.points[0]
    }

    /// The end point.
    #[must_use]
    pub fn end(&self) -> &RoutePoint {
        &self.points[self.points.len() - 1]
    }

    /// Intermediate stops in visiting order.
    #[must_use]
    pub fn waypoints(&self) -> &[RoutePoint] {
        &self.points[1..self.points.len() - 1]
    }

    /// `"<n>. <address>"` lines, 1-based, in visiting order.
    #[must_use]
    pub fn labelled(&self) -> Vec<String> {
        self.points
            .iter()
            .enumerate()
            .map(|(index, point)| format!("{}. {}", index + 1, point.address))
            .collect()
    }

    /// Sum of straight-line legs in kilometres.
    #[must_use]
    pub fn total_distance_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|leg| match leg {
                [from, to] => haversine_km(from.location, to.location),
                _ => 0.0,
            })
            .sum()
    }

    /// Consume the route, yielding its points.
    #[must_use]
    pub fn into_points(self) -> Vec<RoutePoint> {
        self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn stop(text: &str, lat: f64, lon: f64) -> ResolvedAddress {
        ResolvedAddress::new(Address::new(text), GeoPoint::new(lat, lon))
    }

    fn point(role: RouteRole, text: &str) -> RoutePoint {
        RoutePoint::new(role, stop(text, 0.0, 0.0))
    }

    #[fixture]
    fn route() -> Route {
        Route::assemble(
            stop("A", 0.0, 0.0),
            vec![stop("B", 0.0, 1.0), stop("C", 0.0, 2.0)],
            stop("D", 0.0, 3.0),
        )
    }

    #[rstest]
    fn assemble_assigns_roles(route: Route) {
        let roles: Vec<_> = route.points().iter().map(|p| p.role).collect();
        assert_eq!(
            roles,
            [
                RouteRole::Start,
                RouteRole::Intermediate,
                RouteRole::Intermediate,
                RouteRole::End
            ]
        );
        let waypoints: Vec<_> = route
            .waypoints()
            .iter()
            .map(|p| p.address.normalized())
            .collect();
        assert_eq!(waypoints, ["B", "C"]);
    }

    #[rstest]
    fn assemble_without_intermediates_has_no_waypoints() {
        let route = Route::assemble(stop("A", 0.0, 0.0), Vec::new(), stop("B", 1.0, 1.0));
        assert_eq!(route.len(), 2);
        assert!(route.waypoints().is_empty());
        assert!(!route.is_empty());
    }

    #[rstest]
    fn total_distance_sums_legs(route: Route) {
        let one_degree = haversine_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        assert!((route.total_distance_km() - 3.0 * one_degree).abs() < 1e-9);
    }

    #[rstest]
    #[case(Vec::new(), RouteError::TooShort { count: 0 })]
    #[case(vec![point(RouteRole::Start, "A")], RouteError::TooShort { count: 1 })]
    #[case(
        vec![point(RouteRole::Intermediate, "A"), point(RouteRole::End, "B")],
        RouteError::MisplacedRole { index: 0, expected: RouteRole::Start, found: RouteRole::Intermediate }
    )]
    #[case(
        vec![point(RouteRole::Start, "A"), point(RouteRole::Start, "B")],
        RouteError::MisplacedRole { index: 1, expected: RouteRole::End, found: RouteRole::Start }
    )]
    #[case(
        vec![point(RouteRole::Start, "A"), point(RouteRole::End, "B"), point(RouteRole::End, "C")],
        RouteError::MisplacedRole { index: 1, expected: RouteRole::Intermediate, found: RouteRole::End }
    )]
    fn new_rejects_bad_layouts(#[case] points: Vec<RoutePoint>, #[case] expected: RouteError) {
        assert_eq!(Route::new(points), Err(expected));
    }

    #[rstest]
    fn new_accepts_valid_layout(route: Route) {
        let rebuilt = Route::new(route.clone().into_points()).expect("valid layout");
        assert_eq!(rebuilt, route);
    }
}
