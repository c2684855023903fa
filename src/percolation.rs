use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::error::{Error, Result};
use crate::union_find::UnionFind;

/// Which grid edges a component touches. Only meaningful on union-find roots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reach {
    None,
    Top,
    Bottom,
    Both,
}

impl Reach {
    pub fn touches_top(self) -> bool {
        self == Reach::Top || self == Reach::Both
    }

    pub fn touches_bottom(self) -> bool {
        self == Reach::Bottom || self == Reach::Both
    }

    fn from_flags(top: bool, bottom: bool) -> Reach {
        match (top, bottom) {
            (false, false) => Reach::None,
            (true, false) => Reach::Top,
            (false, true) => Reach::Bottom,
            (true, true) => Reach::Both,
        }
    }
}

impl BitOr for Reach {
    type Output = Reach;

    fn bitor(self, other: Reach) -> Reach {
        Reach::from_flags(
            self.touches_top() || other.touches_top(),
            self.touches_bottom() || other.touches_bottom(),
        )
    }
}

impl BitOrAssign for Reach {
    fn bitor_assign(&mut self, other: Reach) {
        *self = *self | other;
    }
}

/// An n-by-n grid of sites, all blocked at construction.
///
/// Rows and columns are 1-based. Site `(row, col)` is union-find element
/// `(row - 1) * n + (col - 1)`; element `n * n` is the virtual top. There is no
/// virtual bottom: bottom reachability is carried by the `Reach` tag of each root,
/// so `is_full` can never be fooled by backwash.
#[derive(Clone, Debug)]
pub struct Percolation {
    n: usize,
    opened: Vec<bool>,
    reach: Vec<Reach>,
    uf: UnionFind,
    top: usize,
    open_sites: usize,
}

impl Percolation {
    pub fn new(n: usize) -> Result<Percolation> {
        if n == 0 {
            return Err(Error::InvalidArgument { name: "grid size", value: n });
        }
        let sites = match n.checked_mul(n).and_then(|s| s.checked_add(1)) {
            Some(elements) => elements - 1,
            None => return Err(Error::InvalidArgument { name: "grid size", value: n }),
        };
        Ok(Percolation {
            n,
            opened: vec![false; sites],
            reach: vec![Reach::None; sites + 1],
            uf: UnionFind::new(sites + 1),
            top: sites,
            open_sites: 0,
        })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    /// Maps a flat 0-based site index to 1-based `(row, col)`.
    pub fn site_of(&self, index: usize) -> Result<(usize, usize)> {
        if index >= self.opened.len() {
            return Err(Error::IndexError { index, len: self.opened.len() });
        }
        Ok((index / self.n + 1, index % self.n + 1))
    }

    /// Opens the site if it is not open already.
    pub fn open(&mut self, row: usize, col: usize) -> Result<()> {
        let site = self.index(row, col)?;
        if self.opened[site] {
            return Ok(());
        }
        self.opened[site] = true;
        self.open_sites += 1;

        let mut reach = Reach::None;
        if row == self.n {
            reach |= Reach::Bottom;
        }
        self.reach[site] |= reach;
        if row == 1 {
            self.merge(site, self.top)?;
            let root = self.uf.find(site)?;
            self.reach[root] |= Reach::Top;
        }

        if row > 1 {
            self.merge_if_open(site, site - self.n)?;
        }
        if row < self.n {
            self.merge_if_open(site, site + self.n)?;
        }
        if col > 1 {
            self.merge_if_open(site, site - 1)?;
        }
        if col < self.n {
            self.merge_if_open(site, site + 1)?;
        }
        Ok(())
    }

    pub fn is_open(&self, row: usize, col: usize) -> Result<bool> {
        let site = self.index(row, col)?;
        Ok(self.opened[site])
    }

    /// Open and connected to the top row through open sites.
    pub fn is_full(&self, row: usize, col: usize) -> Result<bool> {
        let site = self.index(row, col)?;
        if !self.opened[site] {
            return Ok(false);
        }
        let root = self.uf.find(site)?;
        Ok(self.reach[root].touches_top())
    }

    pub fn number_of_open_sites(&self) -> usize {
        self.open_sites
    }

    pub fn percolates(&self) -> bool {
        // every component touching the top has been merged into the virtual top
        self.reach[self.uf.root(self.top)] == Reach::Both
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row < 1 || row > self.n || col < 1 || col > self.n {
            return Err(Error::SiteIndexError { row, col, n: self.n });
        }
        Ok((row - 1) * self.n + (col - 1))
    }

    fn merge_if_open(&mut self, site: usize, neighbour: usize) -> Result<()> {
        if self.opened[neighbour] {
            self.merge(site, neighbour)?;
        }
        Ok(())
    }

    fn merge(&mut self, a: usize, b: usize) -> Result<()> {
        let reach = self.reach[self.uf.find(a)?] | self.reach[self.uf.find(b)?];
        self.uf.union(a, b)?;
        let root = self.uf.find(a)?;
        self.reach[root] = reach;
        Ok(())
    }
}

impl fmt::Display for Percolation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 1..=self.n {
            for col in 1..=self.n {
                let c = match (self.is_open(row, col), self.is_full(row, col)) {
                    (Ok(true), Ok(true)) => 'o',
                    (Ok(true), _) => '.',
                    _ => '#',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use std::collections::VecDeque;

    // Breadth-first flood from every open top-row site.
    fn slow_full(n: usize, open: &[bool]) -> Vec<bool> {
        let mut full = vec![false; n * n];
        let mut queue = VecDeque::new();
        for col in 0..n {
            if open[col] {
                full[col] = true;
                queue.push_back(col);
            }
        }
        while let Some(site) = queue.pop_front() {
            let (r, c) = (site / n, site % n);
            let mut next = Vec::new();
            if r > 0 { next.push(site - n); }
            if r + 1 < n { next.push(site + n); }
            if c > 0 { next.push(site - 1); }
            if c + 1 < n { next.push(site + 1); }
            for s in next {
                if open[s] && !full[s] {
                    full[s] = true;
                    queue.push_back(s);
                }
            }
        }
        full
    }

    #[test]
    fn test_full_matches_flood_fill() {
        let mut rng = rand::thread_rng();
        for _ in 0..40 {
            let n = rng.gen_range(1, 12);
            let mut perc = Percolation::new(n).unwrap();
            let mut order = (0..n * n).collect::<Vec<_>>();
            order.shuffle(&mut rng);
            let mut open = vec![false; n * n];
            let mut last_open_sites = 0;

            for &site in &order {
                let (row, col) = perc.site_of(site).unwrap();
                perc.open(row, col).unwrap();
                open[site] = true;
                assert!(perc.number_of_open_sites() >= last_open_sites);
                last_open_sites = perc.number_of_open_sites();

                let full = slow_full(n, &open);
                for s in 0..n * n {
                    let (r, c) = perc.site_of(s).unwrap();
                    assert_eq!(perc.is_full(r, c).unwrap(), full[s]);
                    if full[s] {
                        assert!(perc.is_open(r, c).unwrap());
                    }
                }
                let slow_percolates = (0..n).any(|col| full[(n - 1) * n + col]);
                assert_eq!(perc.percolates(), slow_percolates);
            }
            assert_eq!(perc.number_of_open_sites(), n * n);
            assert!(perc.percolates());
        }
    }

    #[test]
    fn test_single_site() {
        let mut perc = Percolation::new(1).unwrap();
        assert!(!perc.percolates());
        assert!(!perc.is_full(1, 1).unwrap());
        perc.open(1, 1).unwrap();
        assert!(perc.percolates());
        assert!(perc.is_full(1, 1).unwrap());
    }

    #[test]
    fn test_isolated_bottom_site() {
        let mut perc = Percolation::new(3).unwrap();
        for &(row, col) in &[(1, 3), (2, 3), (3, 3), (3, 1)] {
            perc.open(row, col).unwrap();
        }
        assert!(perc.percolates());
        assert!(perc.is_open(3, 1).unwrap());
        assert!(!perc.is_full(3, 1).unwrap());
        assert!(perc.is_full(3, 3).unwrap());
        assert_eq!(format!("{}", perc), "##o\n##o\n.#o\n");
    }

    #[test]
    fn test_no_backwash() {
        let n = 5;
        let mut perc = Percolation::new(n).unwrap();
        // path down column 5, then the bottom row except (5, 1) and (5, 2)
        for row in 1..=n {
            perc.open(row, n).unwrap();
        }
        for col in 3..=n {
            perc.open(n, col).unwrap();
        }
        perc.open(n, 1).unwrap();
        assert!(perc.percolates());
        assert!(!perc.is_full(n, 1).unwrap());
        perc.open(4, 1).unwrap();
        assert!(!perc.is_full(4, 1).unwrap());

        perc.open(n, 2).unwrap();
        assert!(perc.is_full(n, 1).unwrap());
        assert!(perc.is_full(4, 1).unwrap());
        assert!(!perc.is_full(3, 1).unwrap());
    }

    #[test]
    fn test_open_is_idempotent() {
        let mut perc = Percolation::new(4).unwrap();
        perc.open(2, 2).unwrap();
        perc.open(2, 2).unwrap();
        assert_eq!(perc.number_of_open_sites(), 1);
        perc.open(1, 2).unwrap();
        perc.open(1, 2).unwrap();
        assert_eq!(perc.number_of_open_sites(), 2);
        assert!(perc.is_full(2, 2).unwrap());
    }

    #[test]
    fn test_top_row_is_full_once_open() {
        let mut perc = Percolation::new(4).unwrap();
        assert!(!perc.is_full(1, 3).unwrap());
        perc.open(1, 3).unwrap();
        assert!(perc.is_full(1, 3).unwrap());
        assert!(!perc.is_full(1, 2).unwrap());
        assert!(!perc.percolates());
    }

    #[test]
    fn test_bad_arguments() {
        assert!(Percolation::new(0).is_err());
        match Percolation::new(usize::max_value()) {
            Err(Error::InvalidArgument { name, .. }) => assert_eq!(name, "grid size"),
            other => panic!("unexpected {:?}", other.map(|p| p.size())),
        }
        match Percolation::new(1 << (std::mem::size_of::<usize>() * 4)) {
            Err(Error::InvalidArgument { .. }) => {}
            other => panic!("unexpected {:?}", other.map(|p| p.size())),
        }

        let mut perc = Percolation::new(3).unwrap();
        assert_eq!(perc.size(), 3);
        assert!(perc.open(0, 1).unwrap_err().is_index_error());
        assert!(perc.open(1, 4).is_err());
        assert!(perc.is_open(4, 1).is_err());
        assert!(perc.is_full(2, 0).is_err());
        assert!(perc.site_of(9).is_err());
        assert_eq!(perc.site_of(5).unwrap(), (2, 3));
        assert_eq!(perc.number_of_open_sites(), 0);
    }

    #[test]
    fn test_reach_or() {
        assert_eq!(Reach::None | Reach::Top, Reach::Top);
        assert_eq!(Reach::Top | Reach::Bottom, Reach::Both);
        assert_eq!(Reach::Bottom | Reach::Bottom, Reach::Bottom);
        assert_eq!(Reach::Both | Reach::None, Reach::Both);
        let mut r = Reach::Bottom;
        r |= Reach::None;
        assert!(!r.touches_top());
        assert!(r.touches_bottom());
    }
}
