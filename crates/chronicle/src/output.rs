use chronicle_ingest::BatchSummary;

pub fn print_summary(summary: &BatchSummary, log_type: &str, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }
    println!(
        "pushed {} {log_type} log(s) to Chronicle in {} request(s)",
        summary.entries, summary.requests
    );
    Ok(())
}

pub fn print_lines(lines: &[String], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(lines)?);
        return Ok(());
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}
