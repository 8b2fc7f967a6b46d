use crate::collector::Collector;
use crate::records::LookupOutcome;
use crate::Result;

const BORDER: &str = "####################";
const FOUND: &str = "нашелся";
const NOT_FOUND: &str = "не нашелся";

pub struct ReportWriter;

impl ReportWriter {
    /// Render every outcome as a bordered block, in collection order
    pub fn pretty(collector: &Collector) -> String {
        collector.iter().map(Self::block).collect()
    }

    /// Render one outcome; the detail link, when present, gets its own paragraph
    pub fn block(outcome: &LookupOutcome) -> String {
        let verdict = if outcome.found { FOUND } else { NOT_FOUND };
        let mut msg = format!(
            "Пользователь {} {} {}",
            outcome.username, outcome.birthday, verdict
        );

        if let Some(link) = outcome.link.as_deref().filter(|l| !l.is_empty()) {
            msg.push_str("\n\n");
            msg.push_str(link);
        }

        format!("{BORDER}\n{msg}\n{BORDER}\n\n")
    }

    /// Render all outcomes as a pretty JSON array
    pub fn json(collector: &Collector) -> Result<String> {
        tracing::debug!("Converting {} outcomes to JSON", collector.len());

        Ok(serde_json::to_string_pretty(collector.all())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::InputRecord;

    #[test]
    fn test_found_block_has_link_on_own_line() {
        let record = InputRecord::new("X", "Y");
        let block = ReportWriter::block(&LookupOutcome::found(&record, "L"));

        assert!(block.contains("X"));
        assert!(block.contains("Y"));
        assert!(block.contains(FOUND));
        assert!(block.lines().any(|line| line == "L"));
        assert_eq!(
            block,
            "####################\nПользователь X Y нашелся\n\nL\n####################\n\n"
        );
    }

    #[test]
    fn test_not_found_block_has_no_link() {
        let record = InputRecord::new("ivanov", "01.01.1980");
        let block = ReportWriter::block(&LookupOutcome::not_found(&record));

        assert_eq!(
            block,
            "####################\nПользователь ivanov 01.01.1980 не нашелся\n####################\n\n"
        );
    }

    #[test]
    fn test_pretty_keeps_order() {
        let mut collector = Collector::new();
        collector.add(LookupOutcome::not_found(&InputRecord::new("first", "1")));
        collector.add(LookupOutcome::not_found(&InputRecord::new("second", "2")));

        let report = ReportWriter::pretty(&collector);
        let first = report.find("first").unwrap();
        let second = report.find("second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_pretty_empty_collector() {
        assert_eq!(ReportWriter::pretty(&Collector::new()), "");
    }

    #[test]
    fn test_json_report() {
        let mut collector = Collector::new();
        collector.add(LookupOutcome::found(
            &InputRecord::new("petrov", "02.02.1975"),
            "https://example.com/p",
        ));

        let json = ReportWriter::json(&collector).unwrap();
        let parsed: Vec<LookupOutcome> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, collector.all());
    }
}
