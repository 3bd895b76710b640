use egui::{Pos2, Rect, Vec2, pos2};

/// a segment or line given by its start point and the direction to its end point
pub type Line2 = (Pos2, Vec2);

pub fn line_from_to(from: Pos2, to: Pos2) -> Line2 {
    (from, to - from)
}

/// cross product of `dir` and `p - a`.
/// the sign tells on which side of the line `p` lies, zero if on the line.
/// the magnitude is not normalized.
pub fn side_of((a, dir): Line2, p: Pos2) -> f32 {
    dir.x * (p.y - a.y) - dir.y * (p.x - a.x)
}

/// true iff both endpoints of `segment` lie strictly on opposite sides of `line`.
/// an endpoint exactly on the line does not count as separated.
fn separates(line: Line2, (b, db): Line2) -> bool {
    let s = side_of(line, b);
    let t = side_of(line, b + db);
    (s > 0.0 && t < 0.0) || (s < 0.0 && t > 0.0)
}

/// segments cross iff each one separates the endpoints of the other.
/// touching (an endpoint on the other segment) and collinear overlap are not crossings.
pub fn segments_cross(l1: Line2, l2: Line2) -> bool {
    separates(l1, l2) && separates(l2, l1)
}

/// returns [`t`] in [`a + t * da = b + s * db`]
pub fn intersection_step((a, da): Line2, (b, db): Line2) -> f32 {
    //a, da == p, r
    //b, db == q, s
    let numerator = (a.y - b.y) * db.x - (a.x - b.x) * db.y;
    let denominator = da.x * db.y - da.y * db.x;
    numerator / denominator
}

/// the point where the two segments cross, `None` if they don't (see [`segments_cross`]).
pub fn crossing_point(l1: Line2, l2: Line2) -> Option<Pos2> {
    if !segments_cross(l1, l2) {
        return None;
    }
    //crossing segments are never parallel, thus the denominator is nonzero
    let (a, da) = l1;
    Some(a + intersection_step(l1, l2) * da)
}

/// the rectangle `[margin, width - margin] x [margin, height - margin]`.
/// panics if nothing is left after removing the margin.
pub fn inset(outer: Rect, margin: f32) -> Rect {
    let res = outer.shrink(margin);
    assert!(
        res.width() > 0.0 && res.height() > 0.0,
        "area of size {:?} too small for a margin of {margin}",
        outer.size()
    );
    res
}

/// moves `p` to the closest point in `rect`
pub fn clamp_into(rect: Rect, p: Pos2) -> Pos2 {
    pos2(
        p.x.clamp(rect.min.x, rect.max.x),
        p.y.clamp(rect.min.y, rect.max.y),
    )
}
