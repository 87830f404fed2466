use crate::error::Result;
use crate::models::answer::ScoreCategory;
use crate::models::report::{AggregateReport, HiringRecommendation};
use rust_xlsxwriter::*;

pub struct ExportService;

impl ExportService {
    fn score_color(score: f64) -> Color {
        if score >= 8.0 {
            Color::RGB(0x10B981) // Emerald
        } else if score >= 6.0 {
            Color::RGB(0xF59E0B) // Amber
        } else {
            Color::RGB(0xEF4444) // Red
        }
    }

    fn recommendation_color(rec: HiringRecommendation) -> Color {
        match rec {
            HiringRecommendation::StrongHire => Color::RGB(0x10B981),
            HiringRecommendation::Consider => Color::RGB(0xF59E0B),
            HiringRecommendation::Reject => Color::RGB(0xEF4444),
            HiringRecommendation::Incomplete => Color::RGB(0x64748B),
        }
    }

    fn bullet_list(items: &[String]) -> String {
        if items.is_empty() {
            return "—".to_string();
        }
        items
            .iter()
            .map(|i| format!("• {}", i))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn write_pair(
        sheet: &mut Worksheet,
        row: &mut u32,
        (label_format, value_format): (&Format, &Format),
        label: &str,
        value: &str,
    ) -> Result<()> {
        sheet.write_string_with_format(*row, 0, label, label_format)?;
        sheet.write_string_with_format(*row, 1, value, value_format)?;
        *row += 1;
        Ok(())
    }

    /// Render an interview report as a styled two-sheet XLSX workbook.
    pub fn render_report_xlsx(report: &AggregateReport) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();

        // ── Color palette ──
        let primary_color = Color::RGB(0x1E293B); // Slate 800
        let header_bg = Color::RGB(0x0F172A); // Slate 900
        let header_text = Color::White;
        let alt_row_1 = Color::RGB(0xF8FAFC); // Slate 50
        let alt_row_2 = Color::White;
        let border_color = Color::RGB(0xE2E8F0); // Slate 200

        let title_format = Format::new()
            .set_font_size(16)
            .set_bold()
            .set_font_color(header_text)
            .set_background_color(primary_color)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);

        let subtitle_format = Format::new()
            .set_font_size(10)
            .set_italic()
            .set_font_color(Color::RGB(0x94A3B8))
            .set_background_color(primary_color)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);

        let header_format = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(header_text)
            .set_background_color(header_bg)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);

        let label_format = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_background_color(alt_row_1)
            .set_align(FormatAlign::Top)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);

        let value_format = Format::new()
            .set_font_size(10)
            .set_background_color(alt_row_2)
            .set_align(FormatAlign::Top)
            .set_text_wrap()
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);

        let generated = chrono::Utc::now().format("%d.%m.%Y %H:%M UTC").to_string();

        // ── Summary sheet ──
        {
            let sheet = workbook.add_worksheet();
            sheet.set_name("Summary")?;
            sheet.set_column_width(0, 28.0)?;
            sheet.set_column_width(1, 90.0)?;

            sheet.set_row_height(0, 40)?;
            sheet.merge_range(0, 0, 0, 1, "Interview Report", &title_format)?;
            sheet.set_row_height(1, 22)?;
            let subtitle = format!("Generated: {}  •  Interview: {}", generated, report.interview_id);
            sheet.merge_range(1, 0, 1, 1, &subtitle, &subtitle_format)?;

            let mut row: u32 = 3;
            let formats = (&label_format, &value_format);
            Self::write_pair(sheet, &mut row, formats, "Candidate", &report.candidate_name)?;
            Self::write_pair(sheet, &mut row, formats, "Role", &report.role)?;
            Self::write_pair(sheet, &mut row, formats, "Questions answered", &report.answers.len().to_string())?;
            Self::write_pair(sheet, &mut row, formats, "Total score", &format!("{:.1}", report.total_score))?;
            Self::write_pair(sheet, &mut row, formats, "Average score", &format!("{:.1} / 10", report.average_score))?;
            Self::write_pair(sheet, &mut row, formats, "Interview summary", &report.summary)?;
            Self::write_pair(sheet, &mut row, formats, "Potential", report.verdict.potential.as_str())?;
            Self::write_pair(sheet, &mut row, formats, "Overall feedback", &report.verdict.overall_feedback)?;
            Self::write_pair(sheet, &mut row, formats, "Strengths", &Self::bullet_list(&report.verdict.strengths))?;
            let weaknesses = Self::bullet_list(&report.verdict.critical_weaknesses);
            Self::write_pair(sheet, &mut row, formats, "Critical weaknesses", &weaknesses)?;
            Self::write_pair(sheet, &mut row, formats, "Recommendations", &Self::bullet_list(&report.verdict.recommendations))?;
            Self::write_pair(sheet, &mut row, formats, "Next steps", &Self::bullet_list(&report.verdict.next_steps))?;

            for category in ScoreCategory::ALL {
                if let Some(text) = report.verdict.category_analysis.get(category.key()) {
                    let label = format!("Analysis: {}", category.label());
                    Self::write_pair(sheet, &mut row, formats, &label, text)?;
                }
            }

            // Hiring recommendation (colored)
            let rec = report.verdict.hiring_recommendation;
            let rec_format = Format::new()
                .set_font_size(11)
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Self::recommendation_color(rec))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            let rec_row = row;
            sheet.write_string_with_format(rec_row, 0, "Hiring recommendation", &label_format)?;
            sheet.write_string_with_format(rec_row, 1, rec.as_str(), &rec_format)?;
        }

        // ── Answers sheet ──
        {
            let sheet = workbook.add_worksheet();
            sheet.set_name("Answers")?;

            let columns = [
                ("#", 6.0),
                ("Question", 50.0),
                ("Answer", 70.0),
                ("Score", 10.0),
                ("Technical depth", 14.0),
                ("Problem solving", 14.0),
                ("Communication", 14.0),
                ("Experience", 14.0),
                ("Critical thinking", 14.0),
                ("Feedback", 60.0),
            ];
            for (i, (_, width)) in columns.iter().enumerate() {
                sheet.set_column_width(i as u16, *width)?;
            }

            sheet.set_row_height(0, 30)?;
            for (i, (name, _)) in columns.iter().enumerate() {
                sheet.write_string_with_format(0, i as u16, *name, &header_format)?;
            }

            for (idx, answer) in report.answers.iter().enumerate() {
                let row = 1 + idx as u32;
                let bg = if idx % 2 == 0 { alt_row_1 } else { alt_row_2 };

                let base_fmt = Format::new()
                    .set_font_size(10)
                    .set_background_color(bg)
                    .set_align(FormatAlign::Top)
                    .set_border(FormatBorder::Thin)
                    .set_border_color(border_color);
                let center_fmt = base_fmt.clone().set_align(FormatAlign::Center);
                let wrap_fmt = base_fmt.clone().set_text_wrap();
                let score_fmt = center_fmt
                    .clone()
                    .set_bold()
                    .set_num_format("0.0")
                    .set_font_color(Self::score_color(answer.score));

                sheet.write_number_with_format(row, 0, (answer.question_index + 1) as f64, &center_fmt)?;
                sheet.write_string_with_format(row, 1, &answer.question, &wrap_fmt)?;
                sheet.write_string_with_format(row, 2, &answer.answer, &wrap_fmt)?;
                sheet.write_number_with_format(row, 3, answer.score, &score_fmt)?;

                let subs = [
                    answer.technical_depth,
                    answer.problem_solving,
                    answer.communication,
                    answer.experience,
                    answer.critical_thinking,
                ];
                for (offset, value) in subs.iter().enumerate() {
                    sheet.write_number_with_format(row, 4 + offset as u16, *value, &center_fmt)?;
                }
                sheet.write_string_with_format(row, 9, &answer.feedback, &wrap_fmt)?;
            }

            // Freeze panes (header stays visible while scrolling)
            sheet.set_freeze_panes(1, 0)?;
        }

        let buffer = workbook.save_to_buffer()?;
        Ok(buffer)
    }
}
