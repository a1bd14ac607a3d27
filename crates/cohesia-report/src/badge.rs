/// Status badge parameterized by the overall score, in the flat style
/// build badges use. Color follows the same bands as the terminal
/// report: green from 80, yellow from 50, red below.
pub fn render(score: f64) -> String {
    let color = if score >= 80.0 {
        "#4c1"
    } else if score >= 50.0 {
        "#dfb317"
    } else {
        "#e05d44"
    };
    let value = format!("{score:.1}");
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="124" height="20" role="img" aria-label="cohesion: {value}">
<linearGradient id="s" x2="0" y2="100%">
<stop offset="0" stop-color="#bbb" stop-opacity=".1"/>
<stop offset="1" stop-opacity=".1"/>
</linearGradient>
<rect rx="3" width="124" height="20" fill="#555"/>
<rect rx="3" x="66" width="58" height="20" fill="{color}"/>
<rect rx="3" width="124" height="20" fill="url(#s)"/>
<g fill="#fff" text-anchor="middle" font-family="Verdana,Geneva,DejaVu Sans,sans-serif" font-size="11">
<text x="33" y="14">cohesion</text>
<text x="95" y="14">{value}</text>
</g>
</svg>
"##
    )
}
