//! Closed union over every curve kind the kernel knows.

use kw_core::Result;
use kw_math::{Aabb3, Plane, Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::{Arc, Circle, Curve, Ellipse, Line, NurbsCurve, PolyCurve, Polyline};

/// Any supported curve. Dispatches [`Curve`] by `match`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurveKind {
    Line(Line),
    Arc(Arc),
    Circle(Circle),
    Ellipse(Ellipse),
    Nurbs(NurbsCurve),
    Polyline(Polyline),
    PolyCurve(PolyCurve),
}

macro_rules! dispatch {
    ($self:expr, $c:ident => $body:expr) => {
        match $self {
            CurveKind::Line($c) => $body,
            CurveKind::Arc($c) => $body,
            CurveKind::Circle($c) => $body,
            CurveKind::Ellipse($c) => $body,
            CurveKind::Nurbs($c) => $body,
            CurveKind::Polyline($c) => $body,
            CurveKind::PolyCurve($c) => $body,
        }
    };
}

impl CurveKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            CurveKind::Line(_) => "line",
            CurveKind::Arc(_) => "arc",
            CurveKind::Circle(_) => "circle",
            CurveKind::Ellipse(_) => "ellipse",
            CurveKind::Nurbs(_) => "nurbs",
            CurveKind::Polyline(_) => "polyline",
            CurveKind::PolyCurve(_) => "poly_curve",
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            CurveKind::Line(line) => Some(line),
            _ => None,
        }
    }
}

impl Curve for CurveKind {
    fn point_at(&self, t: f64) -> Point3 {
        dispatch!(self, c => c.point_at(t))
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        dispatch!(self, c => c.tangent_at(t))
    }

    fn domain(&self) -> (f64, f64) {
        dispatch!(self, c => c.domain())
    }

    fn is_closed(&self) -> bool {
        dispatch!(self, c => c.is_closed())
    }

    fn point_at_checked(&self, t: f64) -> Result<Point3> {
        dispatch!(self, c => c.point_at_checked(t))
    }

    fn length(&self) -> f64 {
        dispatch!(self, c => c.length())
    }

    fn point_at_length(&self, length: f64) -> Result<Point3> {
        dispatch!(self, c => c.point_at_length(length))
    }

    fn bounding_box(&self) -> Aabb3 {
        dispatch!(self, c => c.bounding_box())
    }

    fn closest_point(&self, point: Point3) -> Point3 {
        dispatch!(self, c => c.closest_point(point))
    }

    fn plane_intersections(&self, plane: &Plane, tolerance: f64) -> Vec<Point3> {
        dispatch!(self, c => c.plane_intersections(plane, tolerance))
    }
}

macro_rules! impl_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for CurveKind {
                fn from(curve: $ty) -> Self {
                    CurveKind::$variant(curve)
                }
            }
        )*
    };
}

impl_from!(
    Line(Line),
    Arc(Arc),
    Circle(Circle),
    Ellipse(Ellipse),
    Nurbs(NurbsCurve),
    Polyline(Polyline),
    PolyCurve(PolyCurve),
);
