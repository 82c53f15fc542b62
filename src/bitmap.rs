const NUM_BITS: u8 = u32::BITS as u8;

/// Occupancy bitmap of the 32 slots of a branch node.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Bitmap(u32);

impl Bitmap {
    pub fn new() -> Self {
        Bitmap(0)
    }

    pub fn get(&self, i: u8) -> bool {
        self.0 & (1 << i) != 0
    }

    pub fn set(&self, i: u8) -> Self {
        Bitmap(self.0 | (1 << i))
    }

    pub fn unset(&self, i: u8) -> Self {
        Bitmap(self.0 & !(1 << i))
    }

    pub fn size(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Position of slot `i` in the dense entry vector.
    pub fn index(&self, i: u8) -> usize {
        (self.0 & ((1 << i) - 1)).count_ones() as usize
    }

    pub fn union(&self, other: Self) -> Self {
        Bitmap(self.0 | other.0)
    }

    pub fn intersection(&self, other: Self) -> Self {
        Bitmap(self.0 & other.0)
    }

    /// Returns occupied slots in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> {
        let bits = self.0;

        (0..NUM_BITS).filter(move |i| bits & (1 << i) != 0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new() {
        Bitmap::new();
    }

    #[test]
    fn get() {
        let b = Bitmap::new();

        assert!(!b.get(0));
        assert!(!b.get(1));
        assert!(!b.get(31));
        assert!(b.set(0).get(0));
        assert!(!b.set(1).get(0));
        assert!(b.set(1).get(1));
        assert!(b.set(31).get(31));
    }

    #[test]
    fn set() {
        let b = Bitmap::new();

        assert_eq!(b.set(0), Bitmap(1));
        assert_eq!(b.set(1), Bitmap(2));
        assert_eq!(b.set(31), Bitmap(1 << 31));
    }

    #[test]
    fn unset() {
        let b = Bitmap::new();

        assert_eq!(b.set(0).unset(0), Bitmap(0));
        assert_eq!(b.set(0).set(1).unset(0), Bitmap(2));
        assert_eq!(b.set(0).set(1).unset(1), Bitmap(1));
    }

    #[test]
    fn size() {
        let b = Bitmap::new();

        assert_eq!(b.size(), 0);
        assert_eq!(b.set(0).size(), 1);
        assert_eq!(b.set(0).set(1).size(), 2);
        assert_eq!(b.set(31).size(), 1);
    }

    #[test]
    fn index() {
        let b = Bitmap::new().set(3).set(7).set(31);

        assert_eq!(b.index(0), 0);
        assert_eq!(b.index(3), 0);
        assert_eq!(b.index(7), 1);
        assert_eq!(b.index(8), 2);
        assert_eq!(b.index(31), 2);
    }

    #[test]
    fn union_and_intersection() {
        let b = Bitmap::new().set(1).set(2);
        let c = Bitmap::new().set(2).set(3);

        assert_eq!(b.union(c), Bitmap(0b1110));
        assert_eq!(b.intersection(c), Bitmap(0b0100));
    }

    #[test]
    fn iter() {
        assert_eq!(
            Bitmap::new().set(31).set(0).set(5).iter().collect::<Vec<_>>(),
            vec![0, 5, 31]
        );
        assert_eq!(Bitmap::new().iter().count(), 0);
    }
}
