//! Analysis statistics collection and reporting.
//!
//! Tracks graph size, path search results, resolved regions, validation
//! results and elapsed time.

use std::time::Instant;

/// Counters of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisStats {
    start_time: Instant,
    pub interfaces: u64,
    pub connections: u64,
    pub seeds: u64,

    pub paths_found: u64,
    pub paths_redundant: u64,
    pub paths_discarded: u64,

    pub regions_resolved: u64,
    pub diagnostics: u64,

    pub containers_validated: u64,
    pub containers_failed: u64,
}

impl Default for AnalysisStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            interfaces: 0,
            connections: 0,
            seeds: 0,
            paths_found: 0,
            paths_redundant: 0,
            paths_discarded: 0,
            regions_resolved: 0,
            diagnostics: 0,
            containers_validated: 0,
            containers_failed: 0,
        }
    }
}

impl AnalysisStats {
    /// Renders the statistics banner.
    pub fn render(&self) -> String {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let per_seed = if self.seeds == 0 {
            0.0
        } else {
            self.paths_found as f64 / self.seeds as f64
        };

        let mut out = String::new();
        out.push_str("\n==========================================================\n");
        out.push_str("MEMORY VIEW ANALYSIS STATISTICS\n");
        out.push_str("==========================================================\n");
        out.push_str(&format!("host_seconds             {:.4} s\n", seconds));
        out.push_str(&format!("graph_interfaces         {}\n", self.interfaces));
        out.push_str(&format!("graph_connections        {}\n", self.connections));
        out.push_str(&format!("search_seeds             {}\n", self.seeds));
        out.push_str("----------------------------------------------------------\n");
        out.push_str(&format!("paths_found              {}\n", self.paths_found));
        out.push_str(&format!("paths_per_seed           {:.2}\n", per_seed));
        out.push_str(&format!("paths_redundant          {}\n", self.paths_redundant));
        out.push_str(&format!("paths_dead_ends          {}\n", self.paths_discarded));
        out.push_str(&format!("regions_resolved         {}\n", self.regions_resolved));
        out.push_str(&format!("diagnostics              {}\n", self.diagnostics));
        if self.containers_validated > 0 {
            out.push_str("----------------------------------------------------------\n");
            out.push_str(&format!("containers_validated     {}\n", self.containers_validated));
            out.push_str(&format!("containers_failed        {}\n", self.containers_failed));
        }
        out.push_str("==========================================================\n");
        out
    }

    /// Prints the statistics banner to standard error.
    pub fn print(&self) {
        eprint!("{}", self.render());
    }
}
