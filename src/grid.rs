use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::LifeError;

/// グリッド外のセルの扱い
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgePolicy {
    /// グリッド外は死んだセルとして数える
    #[default]
    Dead,
    /// 上下左右をつなげたトーラス
    Wrap,
}

const ALIVE_CHARS: [char; 4] = ['O', '*', '#', '1'];
const DEAD_CHARS: [char; 5] = ['.', '0', '-', '_', ' '];

/// 幅 × 高さ の固定サイズのセル盤面。
///
/// セルは `AtomicBool` で保持するので、`&Grid` を共有したまま複数のワーカーが
/// 互いに重ならない行へ書き込める。世代間の可視性はセマフォのロックで保証する。
pub struct Grid {
    width: usize,
    height: usize,
    edge: EdgePolicy,
    cells: Vec<AtomicBool>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Grid {
            width,
            height,
            edge: EdgePolicy::Dead,
            cells: (0..width * height).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    /// 行優先のセル列からグリッドを作る
    pub fn from_cells(width: usize, height: usize, cells: Vec<bool>) -> Self {
        assert_eq!(cells.len(), width * height, "セル数が幅×高さと一致しません");
        Grid {
            width,
            height,
            edge: EdgePolicy::Dead,
            cells: cells.into_iter().map(AtomicBool::new).collect(),
        }
    }

    /// 生きているセルの座標 (x, y) からグリッドを作る
    pub fn with_live_cells(width: usize, height: usize, live: &[(usize, usize)]) -> Self {
        let grid = Grid::new(width, height);
        for &(x, y) in live {
            grid.set(x, y, true);
        }
        grid
    }

    pub fn with_edge_policy(mut self, edge: EdgePolicy) -> Self {
        self.edge = edge;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn edge_policy(&self) -> EdgePolicy {
        self.edge
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "座標 ({}, {}) は {}x{} のグリッド外です",
            x, y, self.width, self.height
        );
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[self.index(x, y)].load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set(&self, x: usize, y: usize, alive: bool) {
        self.cells[self.index(x, y)].store(alive, Ordering::Relaxed);
    }

    /// 周囲8セルのうち生きているセルの数
    pub fn neighbors(&self, x: usize, y: usize) -> usize {
        let (w, h) = (self.width as isize, self.height as isize);
        // 幅や高さが3未満のトーラスでは同じセルに何度も折り返すので、一度だけ数える
        let mut seen = [(usize::MAX, usize::MAX); 8];
        let mut seen_len = 0;
        let mut count = 0;

        for dy in -1isize..=1 {
            for dx in -1isize..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let mut nx = x as isize + dx;
                let mut ny = y as isize + dy;

                match self.edge {
                    EdgePolicy::Dead => {
                        if nx < 0 || ny < 0 || nx >= w || ny >= h {
                            continue;
                        }
                    }
                    EdgePolicy::Wrap => {
                        nx = nx.rem_euclid(w);
                        ny = ny.rem_euclid(h);
                        let pos = (nx as usize, ny as usize);
                        if pos == (x, y) || seen[..seen_len].contains(&pos) {
                            continue;
                        }
                        seen[seen_len] = pos;
                        seen_len += 1;
                    }
                }

                if self.get(nx as usize, ny as usize) {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn to_cells(&self) -> Vec<bool> {
        self.cells.iter().map(|c| c.load(Ordering::Relaxed)).collect()
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|c| c.load(Ordering::Relaxed)).count()
    }

    /// プレーンテキスト形式（`!` 始まりはコメント、`O` が生、`.` が死）を読み込む。
    /// 短い行は死んだセルで右側を埋める。
    pub fn parse(text: &str) -> Result<Self, LifeError> {
        let mut rows: Vec<Vec<bool>> = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            if line.starts_with('!') {
                continue;
            }
            let mut row = Vec::with_capacity(line.len());
            for (col, ch) in line.trim_end_matches('\r').chars().enumerate() {
                if ALIVE_CHARS.contains(&ch) {
                    row.push(true);
                } else if DEAD_CHARS.contains(&ch) {
                    row.push(false);
                } else {
                    return Err(LifeError::InvalidCell { line: line_no + 1, column: col + 1, ch });
                }
            }
            rows.push(row);
        }

        // 末尾の空行は無視
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let height = rows.len();
        if width == 0 || height == 0 {
            return Err(LifeError::EmptyGrid);
        }

        let mut cells = Vec::with_capacity(width * height);
        for mut row in rows {
            row.resize(width, false);
            cells.extend(row);
        }
        Ok(Grid::from_cells(width, height, cells))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, LifeError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LifeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Grid::parse(&text)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), LifeError> {
        let path = path.as_ref();
        fs::write(path, self.to_string()).map_err(|source| LifeError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn print(&self) {
        print!("{}", self);
    }
}

impl Clone for Grid {
    fn clone(&self) -> Self {
        Grid {
            width: self.width,
            height: self.height,
            edge: self.edge,
            cells: self
                .cells
                .iter()
                .map(|c| AtomicBool::new(c.load(Ordering::Relaxed)))
                .collect(),
        }
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.edge == other.edge
            && self.to_cells() == other.to_cells()
    }
}

impl Eq for Grid {}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{} ({:?})", self.width, self.height, self.edge)?;
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{}", if self.get(x, y) { 'O' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pads_short_rows_and_skips_comments() {
        let grid = Grid::parse("!blinker\n.O.\nO\n\n").unwrap();
        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert!(grid.get(1, 0));
        assert!(grid.get(0, 1));
        assert!(!grid.get(2, 1));
    }

    #[test]
    fn parse_rejects_unknown_characters() {
        match Grid::parse("..\n.x\n") {
            Err(LifeError::InvalidCell { line, column, ch }) => {
                assert_eq!((line, column, ch), (2, 2, 'x'));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert!(matches!(Grid::parse("!only a comment\n\n"), Err(LifeError::EmptyGrid)));
    }

    #[test]
    fn neighbors_at_corner_depend_on_edge_policy() {
        // 四隅だけ生きている 4x4
        let live = [(0, 0), (3, 0), (0, 3), (3, 3)];
        let dead_edges = Grid::with_live_cells(4, 4, &live);
        let torus = Grid::with_live_cells(4, 4, &live).with_edge_policy(EdgePolicy::Wrap);

        assert_eq!(dead_edges.neighbors(0, 0), 0);
        assert_eq!(torus.neighbors(0, 0), 3);
    }

    #[test]
    fn small_torus_counts_each_neighbor_once() {
        let single = Grid::with_live_cells(1, 1, &[(0, 0)]).with_edge_policy(EdgePolicy::Wrap);
        assert_eq!(single.neighbors(0, 0), 0);

        let narrow = Grid::with_live_cells(2, 3, &[(1, 1)]).with_edge_policy(EdgePolicy::Wrap);
        assert_eq!(narrow.neighbors(0, 1), 1);
        assert_eq!(narrow.neighbors(1, 1), 0);
        assert_eq!(narrow.neighbors(0, 0), 1);

        // 2x2 の全セル生存: 自分以外の3セルだけが近傍
        let full = Grid::with_live_cells(2, 2, &[(0, 0), (1, 0), (0, 1), (1, 1)])
            .with_edge_policy(EdgePolicy::Wrap);
        assert_eq!(full.neighbors(0, 0), 3);
    }

    #[test]
    fn equality_includes_edge_policy() {
        let dead = Grid::with_live_cells(3, 3, &[(1, 1)]);
        let torus = dead.clone().with_edge_policy(EdgePolicy::Wrap);
        assert_ne!(dead, torus);
        assert_eq!(torus, torus.clone());
    }

    #[test]
    fn clone_is_deep() {
        let a = Grid::with_live_cells(2, 2, &[(0, 0)]);
        let b = a.clone();
        b.set(1, 1, true);
        assert!(!a.get(1, 1));
        assert_eq!(b.live_count(), 2);
    }
}
