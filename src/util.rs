/// Index of the greatest element.
/// The first one wins on ties, which gives the fixed direction priority.
pub fn argmax<T: PartialOrd>(iter: impl Iterator<Item = T>) -> Option<usize> {
    let mut best: Option<(usize, T)> = None;
    for (i, v) in iter.enumerate() {
        if best.as_ref().map_or(true, |(_, b)| v > *b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}
