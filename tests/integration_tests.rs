//! Integration tests for Texmark full document conversion

use texmark::{
    latex_to_markdown, latex_to_markdown_strict, latex_to_markdown_with_diagnostics, segment,
    SegmentKind, WarningKind,
};

// ============================================================================
// Specification scenarios
// ============================================================================

mod scenarios {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inline_math_with_symbols() {
        let output = latex_to_markdown(r"The value $\alpha + \beta$ is small.");
        assert_eq!(output, "The value \\(α + β\\) is small.");
    }

    #[test]
    fn test_display_math_becomes_fenced_block() {
        let output = latex_to_markdown(r"$$\frac{1}{2} + \sqrt{4}$$");
        assert!(
            output.contains("```math\n1/2 + √4\n```"),
            "expected fenced math block, got: {:?}",
            output
        );
    }

    #[test]
    fn test_itemize_becomes_bulleted_list() {
        let output = latex_to_markdown("Steps:\n\\begin{itemize}\\item A\\item B\\end{itemize}\n");
        assert!(
            output.contains("- A\n- B"),
            "expected bulleted list, got: {:?}",
            output
        );
    }

    #[test]
    fn test_image_description_protected() {
        let input = "**Image Description:** a cat on a mat.\n\nSome $\\pi$ text.";
        let output = latex_to_markdown(input);
        assert_eq!(
            output,
            "**Image Description:** a cat on a mat.\n\nSome \\(π\\) text."
        );
    }
}

// ============================================================================
// Region preservation
// ============================================================================

mod preservation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_marker_text_is_byte_for_byte_identical() {
        let marker = "**Image Description:** graph of $f(x)$ with \\alpha labels.\n\n";
        let input = format!("{}Prose with $\\beta$ math.", marker);
        let output = latex_to_markdown(&input);
        // The marker span passes through unmodified even though it contains
        // convertible LaTeX.
        assert!(output.contains(marker), "marker was modified: {:?}", output);
        assert!(output.contains("\\(β\\)"));
    }

    #[test]
    fn test_figure_caption_protected() {
        let input = "See below.\n\nFigure 2: densities $\\rho_1$ and $\\rho_2$\n\nMore $\\rho$ prose.";
        let output = latex_to_markdown(input);
        assert!(output.contains("Figure 2: densities $\\rho_1$ and $\\rho_2$"));
        assert!(output.contains("\\(ρ\\)"));
    }

    #[test]
    fn test_segment_coverage_reconstructs_input() {
        let input = "Lead-in.\n\n**Image Description:** one.\n\nMiddle.\n\nFigure 1: two\n\nTail.";
        let segments = segment(input);
        let reassembled: String = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(reassembled, input);
        let total: usize = segments.iter().map(|s| s.len()).sum();
        assert_eq!(total, input.len());
        assert!(segments.iter().any(|s| s.kind == SegmentKind::Preserve));
        assert!(segments.iter().any(|s| s.kind == SegmentKind::Process));
    }
}

// ============================================================================
// Code block protection
// ============================================================================

mod code_blocks {
    use super::*;

    #[test]
    fn test_fenced_block_survives_residual_strip() {
        let input = "Example:\n\n```\n\\alpha + \\beta\n```\n\nAnd $\\gamma$ prose \\unknown here.";
        let output = latex_to_markdown(input);
        assert!(
            output.contains("```\n\\alpha + \\beta\n```"),
            "code block was modified: {:?}",
            output
        );
        assert!(output.contains("\\(γ\\)"));
        assert!(!output.contains("\\unknown"));
    }

    #[test]
    fn test_language_tagged_fence_protected() {
        let input = "```latex\n\\frac{1}{2}\n```\n";
        let output = latex_to_markdown(input);
        assert!(output.contains("\\frac{1}{2}"));
    }
}

// ============================================================================
// Math handling
// ============================================================================

mod math {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_aligned_environment_in_display_math() {
        let output =
            latex_to_markdown("$$\\begin{aligned}x &= 1 \\\\ y &= 2\\end{aligned}$$");
        assert!(
            output.contains("```math\nx = 1\ny = 2\n```"),
            "got: {:?}",
            output
        );
    }

    #[test]
    fn test_enumerate_in_prose() {
        let output = latex_to_markdown(
            "Order:\n\\begin{enumerate}\n\\item first\n\\item second\n\\end{enumerate}",
        );
        assert!(output.contains("1. first\n2. second"), "got: {:?}", output);
    }

    #[test]
    fn test_grouping_and_spacing_cleanup() {
        let output = latex_to_markdown(r"$\left( \frac{a}{b} \right)^{2}$");
        assert_eq!(output, "\\(( a/b )^2\\)");
    }

    #[test]
    fn test_operatorname_and_text() {
        let output = latex_to_markdown(r"$\operatorname{argmax}_x \text{ of } f$");
        assert_eq!(output, "\\(argmax_x  of  f\\)");
    }

    #[test]
    fn test_unterminated_display_left_literal() {
        let input = "broken $$x + y";
        assert_eq!(latex_to_markdown(input), input);
    }

    #[test]
    fn test_prose_dollars_untouched() {
        let input = "a $5 fee\nand $6 more";
        assert_eq!(latex_to_markdown(input), input);
    }
}

// ============================================================================
// Properties
// ============================================================================

mod properties {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_conversion_is_idempotent_on_its_output() {
        let inputs = [
            r"The value $\alpha + \beta$ is small.",
            r"$$\frac{1}{2} + \sqrt{4}$$",
            "Steps:\n\\begin{itemize}\\item A\\item B\\end{itemize}\n",
            "**Image Description:** a cat.\n\nSome $\\pi$ text.",
        ];
        for input in inputs {
            let once = latex_to_markdown(input);
            let twice = latex_to_markdown(&once);
            assert_eq!(once, twice, "not idempotent for input: {:?}", input);
        }
    }

    #[test]
    fn test_blank_line_runs_collapse() {
        let output = latex_to_markdown("a\n\n\n\n\n\nb");
        assert_eq!(output, "a\n\nb");
    }

    #[test]
    fn test_heading_fixups() {
        let output = latex_to_markdown("#Intro\n\nThe end .");
        assert_eq!(output, "# Intro\n\nThe end.");
    }
}

// ============================================================================
// Strict mode and diagnostics
// ============================================================================

mod strict_mode {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strict_rejects_unterminated_math() {
        let err = latex_to_markdown_strict("broken $$x").unwrap_err();
        assert!(err.to_string().contains("Unterminated"));
    }

    #[test]
    fn test_strict_accepts_well_formed_input() {
        let output = latex_to_markdown_strict("fine $x$").unwrap();
        assert_eq!(output, "fine \\(x\\)");
    }

    #[test]
    fn test_default_mode_reports_warning_instead() {
        let result = latex_to_markdown_with_diagnostics("broken $$x");
        assert_eq!(result.output, "broken $$x");
        assert!(result
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::UnterminatedMath));
    }

    #[test]
    fn test_clean_conversion_has_no_warnings() {
        let result = latex_to_markdown_with_diagnostics(r"clean $\alpha$ input");
        assert!(!result.has_warnings(), "{:?}", result.format_warnings());
    }
}

mod diagnostics {
    use texmark::diagnostics::{check_document, format_diagnostics};

    #[test]
    fn test_check_reports_unknown_commands() {
        let result = check_document(r"uses \mystery and $\alpha$");
        assert!(!result.is_clean());
        let rendered = format_diagnostics(&result, false);
        assert!(rendered.contains("\\mystery"));
        assert!(!rendered.contains("alpha"));
    }

    #[test]
    fn test_check_clean_document() {
        let result = check_document(r"plain $\alpha + \beta$ prose");
        assert!(result.is_clean());
    }
}
