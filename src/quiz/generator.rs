// src/quiz/generator.rs

//! Template questions with randomised operands.
//!
//! Every template picks operands from fixed ranges, works the answer out with
//! integer arithmetic and derives three wrong options from small perturbations
//! of it. Operand ranges are chosen so divisions and percentages come out exact.

use rand::{Rng, RngCore, seq::SliceRandom};

use super::{Question, Topic};
use crate::config::{OPTION_COUNT, QUIZ_LENGTH};

type Template = fn(&mut dyn RngCore) -> Question;

const ALGEBRA: &[Template] = &[
    equation_solve,
    evaluate_expression,
    division_solve,
    subtract_expression,
];

const GEOMETRY: &[Template] = &[
    triangle_area,
    cube_volume,
    rectangle_perimeter,
    radius_from_diameter,
    compass_turn,
];

const NUMBER: &[Template] = &[
    fraction_to_percent,
    percentage_of,
    hcf,
    lcm,
    capacity_left,
];

const DATA_HANDLING: &[Template] = &[average, sum_from_average, bar_chart, pie_chart_angle];

fn templates(topic: Topic) -> &'static [Template] {
    match topic {
        Topic::Algebra => ALGEBRA,
        Topic::Geometry => GEOMETRY,
        Topic::Number => NUMBER,
        Topic::DataHandling => DATA_HANDLING,
    }
}

/// Ten questions for one topic, cycling through its templates in random order.
pub fn generate(topic: Topic, rng: &mut dyn RngCore) -> Vec<Question> {
    let mut order = templates(topic).to_vec();
    order.shuffle(rng);

    (0..QUIZ_LENGTH)
        .map(|i| order[i % order.len()](rng))
        .collect()
}

/// Ten questions spread round-robin over all topics, then shuffled.
pub fn generate_daily(rng: &mut dyn RngCore) -> Vec<Question> {
    let mut questions: Vec<Question> = (0..QUIZ_LENGTH)
        .map(|i| {
            let topic = Topic::ALL[i % Topic::ALL.len()];
            let set = templates(topic);
            let template = set[rng.gen_range(0..set.len())];
            template(rng)
        })
        .collect();
    questions.shuffle(rng);
    questions
}

/// The answer followed by up to three distinct distractors.
///
/// Candidates that repeat an earlier option are skipped; `filler(step)` for
/// `step = 2, 3, ..` tops the list up and must yield distinct values.
fn with_distractors<I>(answer: &str, candidates: I, mut filler: impl FnMut(i64) -> String) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut options = vec![answer.to_string()];
    for candidate in candidates {
        if options.len() == OPTION_COUNT {
            break;
        }
        if !options.contains(&candidate) {
            options.push(candidate);
        }
    }

    let mut step = 2;
    while options.len() < OPTION_COUNT {
        let candidate = filler(step);
        if !options.contains(&candidate) {
            options.push(candidate);
        }
        step += 1;
    }
    options
}

fn finish(
    topic: Topic,
    prompt: String,
    answer: String,
    mut options: Vec<String>,
    explanation: String,
    rng: &mut dyn RngCore,
) -> Question {
    options.shuffle(rng);
    Question {
        id: 0,
        topic,
        prompt,
        options,
        answer,
        explanation,
    }
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

// Algebra

fn equation_solve(rng: &mut dyn RngCore) -> Question {
    let a = rng.gen_range(2..=9);
    let ans = rng.gen_range(2..=12);
    let b = rng.gen_range(1..=20);
    equation_solve_with(a, ans, b, rng)
}

/// `ax + b = c` solved for x.
pub fn equation_solve_with(a: i64, ans: i64, b: i64, rng: &mut dyn RngCore) -> Question {
    let product = a * ans;
    let c = product + b;
    let answer = ans.to_string();
    let options = with_distractors(
        &answer,
        [ans + 1, ans - 1, ans * 2].map(|v| v.to_string()),
        |step| (ans + step).to_string(),
    );
    finish(
        Topic::Algebra,
        format!("Solve for x: {a}x + {b} = {c}"),
        answer,
        options,
        format!("{a}x = {c} - {b} -> {a}x = {product} -> x = {ans}."),
        rng,
    )
}

fn evaluate_expression(rng: &mut dyn RngCore) -> Question {
    let y: i64 = rng.gen_range(2..=12);
    let k: i64 = rng.gen_range(2..=5);
    let product = k * y;
    let d = rng.gen_range(1..=9_i64.min(product - 1));
    let ans = product - d;
    let answer = ans.to_string();
    let options = with_distractors(
        &answer,
        [product, product + d, ans + y].map(|v| v.to_string()),
        |step| (ans + step).to_string(),
    );
    finish(
        Topic::Algebra,
        format!("If y = {y}, what is the value of {k}y - {d}?"),
        answer,
        options,
        format!("{k}({y}) - {d} = {product} - {d} = {ans}."),
        rng,
    )
}

fn division_solve(rng: &mut dyn RngCore) -> Question {
    let d: i64 = rng.gen_range(2..=9);
    let q: i64 = rng.gen_range(2..=12);
    let m = d * q;
    let answer = m.to_string();
    let options = with_distractors(
        &answer,
        [q + d, q, d].map(|v| v.to_string()),
        |step| (m + step).to_string(),
    );
    finish(
        Topic::Algebra,
        format!("Solve: m / {d} = {q}"),
        answer,
        options,
        format!("Multiply both sides by {d}: m = {q} × {d} = {m}."),
        rng,
    )
}

fn subtract_expression(rng: &mut dyn RngCore) -> Question {
    let variable = ['a', 'b', 'm', 'n', 'x', 'y'][rng.gen_range(0..6)];
    let n: i64 = rng.gen_range(2..=9);
    let answer = format!("{variable} - {n}");
    let options = with_distractors(
        &answer,
        [
            format!("{n} - {variable}"),
            format!("{variable} / {n}"),
            format!("{n}{variable}"),
        ],
        |step| format!("{variable} + {}", n + step),
    );
    finish(
        Topic::Algebra,
        format!("Which algebraic expression represents 'subtract {n} from {variable}'?"),
        answer.clone(),
        options,
        format!("Subtracting {n} from {variable} is written as {answer}."),
        rng,
    )
}

// Geometry

fn triangle_area(rng: &mut dyn RngCore) -> Question {
    let base: i64 = rng.gen_range(2..=10) * 2;
    let height: i64 = rng.gen_range(3..=12);
    let area = base * height / 2;
    let unit = |v: i64| format!("{v} cm²");
    let answer = unit(area);
    let options = with_distractors(
        &answer,
        [base * height, base + height, area + base].map(unit),
        |step| unit(area + step),
    );
    finish(
        Topic::Geometry,
        format!("Calculate the area of a triangle with base {base} cm and height {height} cm."),
        answer,
        options,
        format!("Area = (Base × Height) / 2 = ({base} × {height}) / 2 = {area}."),
        rng,
    )
}

fn cube_volume(rng: &mut dyn RngCore) -> Question {
    let side: i64 = rng.gen_range(2..=9);
    let volume = side * side * side;
    let unit = |v: i64| format!("{v} cm³");
    let answer = unit(volume);
    let options = with_distractors(
        &answer,
        [side * side, side * 12, 6 * side * side].map(unit),
        |step| unit(volume + step),
    );
    finish(
        Topic::Geometry,
        format!("What is the volume of a cube with side length {side} cm?"),
        answer,
        options,
        format!("Volume = side × side × side = {side} × {side} × {side} = {volume}."),
        rng,
    )
}

fn rectangle_perimeter(rng: &mut dyn RngCore) -> Question {
    let length: i64 = rng.gen_range(3..=15);
    let width: i64 = rng.gen_range(2..length);
    let perimeter = 2 * (length + width);
    let unit = |v: i64| format!("{v} cm");
    let answer = unit(perimeter);
    let options = with_distractors(
        &answer,
        [length * width, length + width, 2 * length + width].map(unit),
        |step| unit(perimeter + step),
    );
    finish(
        Topic::Geometry,
        format!("A rectangle is {length} cm long and {width} cm wide. What is its perimeter?"),
        answer,
        options,
        format!("Perimeter = 2 × (Length + Width) = 2 × ({length} + {width}) = {perimeter}."),
        rng,
    )
}

fn radius_from_diameter(rng: &mut dyn RngCore) -> Question {
    let diameter: i64 = rng.gen_range(2..=20) * 2;
    let radius = diameter / 2;
    let unit = |v: i64| format!("{v} cm");
    let answer = unit(radius);
    let options = with_distractors(
        &answer,
        [diameter, diameter * 2, diameter * diameter].map(unit),
        |step| unit(radius + step),
    );
    finish(
        Topic::Geometry,
        format!("The diameter of a circle is {diameter} cm. What is its radius?"),
        answer,
        options,
        format!("Radius is half of the diameter. {diameter} / 2 = {radius}."),
        rng,
    )
}

const COMPASS: [&str; 8] = [
    "North",
    "North-East",
    "East",
    "South-East",
    "South",
    "South-West",
    "West",
    "North-West",
];

fn compass_turn(rng: &mut dyn RngCore) -> Question {
    let start = rng.gen_range(0..8usize);
    let steps = rng.gen_range(1..=7usize);
    let clockwise = rng.gen_bool(0.5);
    let degrees = steps * 45;

    let forward = |from: usize, by: usize| (from + by) % 8;
    let backward = |from: usize, by: usize| (from + 8 - by % 8) % 8;

    let (target, wrong_way) = if clockwise {
        (forward(start, steps), backward(start, steps))
    } else {
        (backward(start, steps), forward(start, steps))
    };
    let direction = if clockwise { "clockwise" } else { "anticlockwise" };

    let answer = COMPASS[target].to_string();
    let options = with_distractors(
        &answer,
        [
            COMPASS[wrong_way],
            COMPASS[forward(target, 1)],
            COMPASS[backward(target, 1)],
        ]
        .map(str::to_string),
        |step| COMPASS[forward(target, step as usize)].to_string(),
    );
    finish(
        Topic::Geometry,
        format!(
            "If you face {} and turn {degrees}° {direction}, which direction do you face?",
            COMPASS[start]
        ),
        answer.clone(),
        options,
        format!("Each 45° is one point of the compass, so {degrees}° is {steps} points {direction} from {}, which is {answer}.", COMPASS[start]),
        rng,
    )
}

// Number

fn fraction_to_percent(rng: &mut dyn RngCore) -> Question {
    let denominator: i64 = [2, 4, 5, 10, 20, 25][rng.gen_range(0..6)];
    let numerator = rng.gen_range(1..denominator);
    let percent = numerator * 100 / denominator;
    let unit = |v: i64| format!("{v}%");
    let answer = unit(percent);
    let options = with_distractors(
        &answer,
        [numerator * 10, 100 - percent, percent + denominator].map(unit),
        |step| unit(percent + step * 5),
    );
    finish(
        Topic::Number,
        format!("Convert {numerator}/{denominator} into a percentage."),
        answer,
        options,
        format!("{numerator}/{denominator} = {percent}/100 = {percent}%."),
        rng,
    )
}

fn percentage_of(rng: &mut dyn RngCore) -> Question {
    let percent: i64 = [10, 20, 25, 50, 75][rng.gen_range(0..5)];
    let base: i64 = rng.gen_range(1..=20) * 20;
    let ans = base * percent / 100;
    let answer = ans.to_string();
    let options = with_distractors(
        &answer,
        [percent, base - ans, ans * 2].map(|v| v.to_string()),
        |step| (ans + step).to_string(),
    );
    finish(
        Topic::Number,
        format!("What is {percent}% of {base}?"),
        answer,
        options,
        format!("{percent}% of {base} = {base} × {percent} / 100 = {ans}."),
        rng,
    )
}

const COPRIME_PAIRS: [(i64, i64); 8] = [
    (2, 3),
    (2, 5),
    (3, 4),
    (3, 5),
    (2, 7),
    (4, 5),
    (3, 7),
    (5, 6),
];

fn hcf(rng: &mut dyn RngCore) -> Question {
    let h: i64 = rng.gen_range(2..=9);
    let (p, q) = COPRIME_PAIRS[rng.gen_range(0..COPRIME_PAIRS.len())];
    let (a, b) = (h * p, h * q);
    let answer = h.to_string();
    let options = with_distractors(
        &answer,
        [h * p * q, a.min(b), p * q].map(|v| v.to_string()),
        |step| (h + step).to_string(),
    );
    finish(
        Topic::Number,
        format!("Find the H.C.F (Highest Common Factor) of {a} and {b}."),
        answer,
        options,
        format!("{a} = {h} × {p} and {b} = {h} × {q}. {p} and {q} share no factor, so the HCF is {h}."),
        rng,
    )
}

fn lcm(rng: &mut dyn RngCore) -> Question {
    let a: i64 = rng.gen_range(2..=9);
    let mut b: i64 = rng.gen_range(2..=12);
    if b == a {
        b += 1;
    }
    let common = gcd(a, b);
    let multiple = a * b / common;
    let answer = multiple.to_string();
    let options = with_distractors(
        &answer,
        [a * b, common, a + b].map(|v| v.to_string()),
        |step| (multiple + step).to_string(),
    );
    finish(
        Topic::Number,
        format!("What is the L.C.M (Lowest Common Multiple) of {a} and {b}?"),
        answer,
        options,
        format!("{multiple} is the smallest number that is a multiple of both {a} and {b}. LCM is {multiple}."),
        rng,
    )
}

/// Millilitres as litres with at most one decimal place.
fn litres(ml: i64) -> String {
    if ml % 1000 == 0 {
        format!("{} L", ml / 1000)
    } else {
        format!("{}.{} L", ml / 1000, ml % 1000 / 100)
    }
}

fn capacity_left(rng: &mut dyn RngCore) -> Question {
    let full: i64 = rng.gen_range(2..=9);
    let used: i64 = rng.gen_range(1..=9) * 100;
    let full_ml = full * 1000;
    let left = full_ml - used;
    let answer = litres(left);
    let options = with_distractors(
        &answer,
        [
            litres(full_ml + used),
            format!("{} mL", left / 10),
            litres(left - 100),
        ],
        |step| litres(left + step * 100),
    );
    finish(
        Topic::Number,
        format!("A tank has {full} Liters. {used} mL is used. How much is left?"),
        answer.clone(),
        options,
        format!("{full} L = {full_ml} mL. {full_ml} - {used} = {left} mL = {answer}."),
        rng,
    )
}

// Data Handling

fn average(rng: &mut dyn RngCore) -> Question {
    let mean: i64 = rng.gen_range(10..=40);
    let d1: i64 = rng.gen_range(1..=9);
    let d2: i64 = rng.gen_range(1..=9);
    let values = [mean - d1, mean + d2, mean + d1 - d2];
    let sum: i64 = values.iter().sum();
    let answer = mean.to_string();
    let high = values.iter().copied().max().unwrap_or(mean);
    let low = values.iter().copied().min().unwrap_or(mean);
    let options = with_distractors(
        &answer,
        [sum, high, low].map(|v| v.to_string()),
        |step| (mean + step).to_string(),
    );
    let [x, y, z] = values;
    finish(
        Topic::DataHandling,
        format!("Find the average of: {x}, {y}, {z}"),
        answer,
        options,
        format!("({x} + {y} + {z}) / 3 = {sum} / 3 = {mean}."),
        rng,
    )
}

fn sum_from_average(rng: &mut dyn RngCore) -> Question {
    let mean: i64 = rng.gen_range(5..=30);
    let count: i64 = rng.gen_range(3..=6);
    let sum = mean * count;
    let answer = sum.to_string();
    let options = with_distractors(
        &answer,
        [mean + count, mean * (count - 1), sum + mean].map(|v| v.to_string()),
        |step| (sum + step).to_string(),
    );
    finish(
        Topic::DataHandling,
        format!("The average of {count} numbers is {mean}. What is their sum?"),
        answer,
        options,
        format!("Sum = Average × Count. {mean} × {count} = {sum}."),
        rng,
    )
}

fn bar_chart(rng: &mut dyn RngCore) -> Question {
    let item = ["Apple", "Banana", "Orange", "Grape", "Mango"][rng.gen_range(0..5)];
    let units: i64 = rng.gen_range(3..=15);
    let per_unit: i64 = [2, 4, 5, 10][rng.gen_range(0..4)];
    let people = units * per_unit;
    let answer = people.to_string();
    let options = with_distractors(
        &answer,
        [units, units + per_unit, people + per_unit].map(|v| v.to_string()),
        |step| (people + step).to_string(),
    );
    finish(
        Topic::DataHandling,
        format!(
            "If a bar chart shows {units} units height for '{item}' and 1 unit = {per_unit} people, how many people chose {item}?"
        ),
        answer,
        options,
        format!("{units} units × {per_unit} people/unit = {people} people."),
        rng,
    )
}

fn pie_chart_angle(rng: &mut dyn RngCore) -> Question {
    let class: i64 = [4, 5, 6, 8, 9, 10, 12][rng.gen_range(0..7)];
    let chosen = rng.gen_range(1..class);
    let angle = 360 * chosen / class;
    let unit = |v: i64| format!("{v}°");
    let answer = unit(angle);
    let options = with_distractors(
        &answer,
        [360 - angle, angle + 45, chosen * 10].map(unit),
        |step| unit(angle + step * 10),
    );
    finish(
        Topic::DataHandling,
        format!(
            "In a class of {class} students, {chosen} chose swimming. What angle does swimming take up in a pie chart?"
        ),
        answer,
        options,
        format!("{chosen}/{class} of 360° = {angle}°."),
        rng,
    )
}
