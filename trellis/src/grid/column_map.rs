//! Logical <-> visual column index map for one header level.

/// Bidirectional map between a column's logical index (its position in the
/// header configuration) and its visual index (its display position).
///
/// Slots start unmapped and are initialised to identity the first time the
/// level is sized with [`ensure_columns`](Self::ensure_columns). Afterwards
/// `vtol[ltov[l]] == l` and `ltov[vtol[v]] == v` hold for every mapped slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    ltov: Vec<Option<usize>>,
    vtol: Vec<Option<usize>>,
}

impl ColumnMap {
    pub const EMPTY: Self = Self {
        ltov: Vec::new(),
        vtol: Vec::new(),
    };

    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mapped columns.
    pub fn len(&self) -> usize {
        self.vtol.iter().take_while(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grow the map to `count` columns, mapping new slots to themselves.
    /// Never shrinks.
    pub fn ensure_columns(&mut self, count: usize) {
        if self.vtol.len() < count {
            self.vtol.resize(count, None);
            self.ltov.resize(count, None);
        }
        for i in 0..count {
            if self.vtol[i].is_none() {
                self.vtol[i] = Some(i);
                self.ltov[i] = Some(i);
            }
        }
    }

    pub fn logical(&self, visual: usize) -> Option<usize> {
        self.vtol.get(visual).copied().flatten()
    }

    pub fn visual(&self, logical: usize) -> Option<usize> {
        self.ltov.get(logical).copied().flatten()
    }

    /// Logical indices in display order.
    pub fn visual_order(&self) -> impl Iterator<Item = usize> + '_ {
        self.vtol.iter().map_while(|v| *v)
    }

    /// Exchange the columns shown at visual positions `a` and `b`.
    pub fn swap_visual(&mut self, a: usize, b: usize) {
        let (Some(la), Some(lb)) = (self.logical(a), self.logical(b)) else {
            return;
        };
        self.vtol[a] = Some(lb);
        self.vtol[b] = Some(la);
        self.ltov[la] = Some(b);
        self.ltov[lb] = Some(a);
    }

    /// Rotate the visual slots `first..=last` left by `by`, keeping the
    /// inverse map in step.
    pub fn rotate_visual(&mut self, first: usize, last: usize, by: usize) {
        if first > last || last >= self.vtol.len() {
            return;
        }
        self.vtol[first..=last].rotate_left(by % (last - first + 1));
        for v in first..=last {
            if let Some(l) = self.vtol[v] {
                self.ltov[l] = Some(v);
            }
        }
    }

    /// Whether both directions agree on every mapped slot.
    pub fn is_bijection(&self) -> bool {
        let forward = self.vtol.iter().enumerate().all(|(v, l)| match l {
            Some(l) => self.ltov.get(*l).copied().flatten() == Some(v),
            None => true,
        });
        let backward = self.ltov.iter().enumerate().all(|(l, v)| match v {
            Some(v) => self.vtol.get(*v).copied().flatten() == Some(l),
            None => true,
        });
        forward && backward
    }
}
