use anyhow::Result;
use ndarray::array;
use rs_rpn_anchors::generate_anchors;

// Prints the default RPN anchor table: 16x16 base window, ratios
// [0.5, 1, 2], scales [8, 16, 32].
fn main() -> Result<()> {
    let anchors = generate_anchors(16, &array![0.5, 1.0, 2.0], &array![8.0, 16.0, 32.0])?;

    for row in anchors.outer_iter() {
        println!("({:6.1}, {:6.1}, {:6.1}, {:6.1})", row[0], row[1], row[2], row[3]);
    }

    Ok(())
}
