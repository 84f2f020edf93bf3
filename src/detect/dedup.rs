use super::element::UiElement;

/// Thresholds for overlap removal. The overlap test runs on hint-sized
/// boxes anchored at the element top-left, not on the elements
/// themselves, so two large widgets whose hints would not collide both
/// survive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DedupParams {
    pub distance_px: i32,
    pub area_ratio: f64,
    pub hint_w: i32,
    pub hint_h: i32,
}

fn anchor_distance(a: &UiElement, b: &UiElement) -> f64 {
    let dx = f64::from(b.x - a.x);
    let dy = f64::from(b.y - a.y);
    (dx * dx + dy * dy).sqrt()
}

/// Intersection area over the smaller box area, for two hint boxes of
/// identical size anchored at the element corners.
fn hint_overlap_ratio(a: &UiElement, b: &UiElement, hint_w: i32, hint_h: i32) -> f64 {
    let left = a.x.max(b.x);
    let top = a.y.max(b.y);
    let right = (a.x + hint_w).min(b.x + hint_w);
    let bottom = (a.y + hint_h).min(b.y + hint_h);

    if left >= right || top >= bottom {
        return 0.0;
    }

    let overlap = i64::from(right - left) * i64::from(bottom - top);
    let smaller = i64::from(hint_w) * i64::from(hint_h);
    if smaller <= 0 {
        return 0.0;
    }

    overlap as f64 / smaller as f64
}

/// Removes elements whose hints would crowd each other, keeping the
/// larger element of every colliding pair (the second one loses a tie).
/// Running this on its own output changes nothing.
pub fn remove_overlapping(elements: Vec<UiElement>, params: &DedupParams) -> Vec<UiElement> {
    if elements.len() <= 1 {
        return elements;
    }

    let mut keep = vec![true; elements.len()];

    for i in 0..elements.len() {
        if !keep[i] {
            continue;
        }
        for j in (i + 1)..elements.len() {
            if !keep[j] {
                continue;
            }

            let a = &elements[i];
            let b = &elements[j];

            let colliding = if anchor_distance(a, b) < f64::from(params.distance_px) {
                true
            } else {
                hint_overlap_ratio(a, b, params.hint_w, params.hint_h) > params.area_ratio
            };

            if colliding {
                if a.area() < b.area() {
                    keep[i] = false;
                    break;
                }
                keep[j] = false;
            }
        }
    }

    elements
        .into_iter()
        .zip(keep)
        .filter_map(|(element, kept)| kept.then_some(element))
        .collect()
}
