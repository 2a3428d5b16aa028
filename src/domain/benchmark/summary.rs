use super::job::RenderResult;

pub const SUMMARY_HEADER: &str = "Samples | Time (s) | File";
const SEPARATOR_WIDTH: usize = 50;

/// 結果を固定幅の表に整形する。結果が空なら `None`。
///
/// 列は品質レベル (右寄せ8桁)、経過秒 (小数2桁・右寄せ9桁)、出力ファイル名。
pub fn format_summary(results: &[RenderResult]) -> Option<String> {
    if results.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(results.len() + 2);
    lines.push(SUMMARY_HEADER.to_string());
    lines.push("-".repeat(SEPARATOR_WIDTH));
    for result in results {
        lines.push(format!(
            "{:>8} | {:>9.2} | {}",
            result.quality_level(),
            result.elapsed_seconds(),
            result.output_file_name()
        ));
    }
    Some(lines.join("\n"))
}
