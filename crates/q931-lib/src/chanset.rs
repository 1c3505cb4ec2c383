use core::fmt;

/// Largest number of channels a set holds
pub const CHANSET_MAX: usize = 32;

/// Small ordered set of B-channel numbers.
/// A view on the channels of an interface; it does not own them.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Chanset {
    chans: [u8; CHANSET_MAX],
    nchans: usize,
}

impl Chanset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(chan: u8) -> Self {
        let mut cs = Self::new();
        cs.add(chan);
        cs
    }

    pub fn len(&self) -> usize {
        self.nchans
    }

    pub fn is_empty(&self) -> bool {
        self.nchans == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.chans[..self.nchans]
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.as_slice().iter().copied()
    }

    pub fn first(&self) -> Option<u8> {
        self.as_slice().first().copied()
    }

    pub fn contains(&self, chan: u8) -> bool {
        self.as_slice().contains(&chan)
    }

    /// Add a channel, keeping the set ordered. Returns false when already present or full.
    pub fn add(&mut self, chan: u8) -> bool {
        if self.contains(chan) {
            return false;
        }
        if self.nchans == CHANSET_MAX {
            tracing::warn!("chanset full, dropping channel {}", chan);
            return false;
        }
        let pos = self.as_slice().iter().position(|c| *c > chan).unwrap_or(self.nchans);
        self.chans.copy_within(pos..self.nchans, pos + 1);
        self.chans[pos] = chan;
        self.nchans += 1;
        true
    }

    pub fn remove(&mut self, chan: u8) -> bool {
        let Some(pos) = self.as_slice().iter().position(|c| *c == chan) else {
            return false;
        };
        self.chans.copy_within(pos + 1..self.nchans, pos);
        self.nchans -= 1;
        true
    }

    pub fn clear(&mut self) {
        self.nchans = 0;
    }

    /// Add all channels of `other`
    pub fn merge(&mut self, other: &Chanset) {
        for chan in other.iter() {
            self.add(chan);
        }
    }

    /// Keep only channels also present in `other`
    pub fn intersect(&mut self, other: &Chanset) {
        let mut out = Chanset::new();
        for chan in self.iter().filter(|c| other.contains(*c)) {
            out.add(chan);
        }
        *self = out;
    }

    /// True when every channel of `other` is in this set
    pub fn contains_all(&self, other: &Chanset) -> bool {
        other.iter().all(|c| self.contains(c))
    }
}

impl FromIterator<u8> for Chanset {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut cs = Chanset::new();
        for chan in iter {
            cs.add(chan);
        }
        cs
    }
}

impl fmt::Debug for Chanset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chanset{:?}", self.as_slice())
    }
}

impl fmt::Display for Chanset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|c| format!("B{}", c)).collect();
        write!(f, "{{{}}}", names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_add_remove() {
        let mut cs = Chanset::new();
        assert!(cs.add(5));
        assert!(cs.add(2));
        assert!(!cs.add(5));
        assert!(cs.add(9));
        assert_eq!(cs.as_slice(), &[2, 5, 9]);
        assert!(cs.remove(5));
        assert!(!cs.remove(5));
        assert_eq!(cs.as_slice(), &[2, 9]);
        assert_eq!(cs.to_string(), "{B2,B9}");
    }

    #[test]
    fn test_set_algebra() {
        let a: Chanset = [1, 2, 3].into_iter().collect();
        let b: Chanset = [2, 3, 4].into_iter().collect();

        let mut merged = a;
        merged.merge(&b);
        assert_eq!(merged.as_slice(), &[1, 2, 3, 4]);

        let mut common = a;
        common.intersect(&b);
        assert_eq!(common.as_slice(), &[2, 3]);
        assert!(a.contains_all(&common));
        assert!(!common.contains_all(&a));

        assert_eq!(a, [3, 1, 2].into_iter().collect::<Chanset>());
        assert_ne!(a, b);
    }

    #[test]
    fn test_capacity() {
        let cs: Chanset = (1..=40).collect();
        assert_eq!(cs.len(), CHANSET_MAX);
        assert_eq!(cs.first(), Some(1));
    }
}
