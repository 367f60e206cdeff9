// src/quiz/bank.rs

//! The fixed question bank (Key Stage 2, Primary 5 & 6).

use rand::{RngCore, seq::SliceRandom};

use super::{Question, Topic};
use crate::config::QUIZ_LENGTH;

/// A hand-written question. `options` are shown in the order listed.
#[derive(Debug)]
pub struct BankQuestion {
    pub topic: Topic,
    pub prompt: &'static str,
    pub options: [&'static str; 4],
    pub answer: &'static str,
    pub explanation: &'static str,
}

impl BankQuestion {
    fn to_question(&self) -> Question {
        Question {
            id: 0,
            topic: self.topic,
            prompt: self.prompt.to_string(),
            options: self.options.iter().map(|o| o.to_string()).collect(),
            answer: self.answer.to_string(),
            explanation: self.explanation.to_string(),
        }
    }
}

static QUESTION_BANK: [BankQuestion; 20] = [
    // Algebra
    BankQuestion {
        topic: Topic::Algebra,
        prompt: "Which of the following is an equation?",
        options: ["3x + 5", "y - 4 = 10", "5 + 7 = 12", "x > 6"],
        answer: "y - 4 = 10",
        explanation: "An equation must contain an unknown variable and an equals sign.",
    },
    BankQuestion {
        topic: Topic::Algebra,
        prompt: "Solve for a: 3a + 4 = 19",
        options: ["5", "6", "7", "15"],
        answer: "5",
        explanation: "3a = 19 - 4 -> 3a = 15 -> a = 5.",
    },
    BankQuestion {
        topic: Topic::Algebra,
        prompt: "If y = 6, what is the value of 2y - 3?",
        options: ["9", "10", "12", "15"],
        answer: "9",
        explanation: "2(6) - 3 = 12 - 3 = 9.",
    },
    BankQuestion {
        topic: Topic::Algebra,
        prompt: "Solve: m / 4 = 8",
        options: ["2", "12", "32", "4"],
        answer: "32",
        explanation: "Multiply both sides by 4: m = 8 × 4 = 32.",
    },
    BankQuestion {
        topic: Topic::Algebra,
        prompt: "Which algebraic expression represents 'subtract 5 from y'?",
        options: ["5 - y", "y - 5", "y / 5", "5y"],
        answer: "y - 5",
        explanation: "Subtracting 5 from y is written as y - 5.",
    },
    // Geometry
    BankQuestion {
        topic: Topic::Geometry,
        prompt: "Calculate the area of a triangle with base 12 cm and height 5 cm.",
        options: ["60 cm²", "30 cm²", "34 cm²", "17 cm²"],
        answer: "30 cm²",
        explanation: "Area = (Base × Height) / 2 = (12 × 5) / 2 = 30.",
    },
    BankQuestion {
        topic: Topic::Geometry,
        prompt: "Which 3D shape has 6 square faces, 12 edges, and 8 vertices?",
        options: ["Cuboid", "Square-based pyramid", "Cube", "Triangular prism"],
        answer: "Cube",
        explanation: "A cube is the only shape listed with 6 identical square faces.",
    },
    BankQuestion {
        topic: Topic::Geometry,
        prompt: "If you face North and turn 135° clockwise, which direction do you face?",
        options: ["East", "South-East", "South", "North-East"],
        answer: "South-East",
        explanation: "90° is East. 135° is 90° + 45°, which is South-East.",
    },
    BankQuestion {
        topic: Topic::Geometry,
        prompt: "What is the volume of a cube with side length 4 cm?",
        options: ["16 cm³", "64 cm³", "12 cm³", "24 cm³"],
        answer: "64 cm³",
        explanation: "Volume = side × side × side = 4 × 4 × 4 = 64.",
    },
    BankQuestion {
        topic: Topic::Geometry,
        prompt: "The diameter of a circle is 10 cm. What is its radius?",
        options: ["5 cm", "10 cm", "20 cm", "100 cm"],
        answer: "5 cm",
        explanation: "Radius is half of the diameter. 10 / 2 = 5.",
    },
    // Number
    BankQuestion {
        topic: Topic::Number,
        prompt: "Convert 3/5 into a percentage.",
        options: ["30%", "50%", "60%", "75%"],
        answer: "60%",
        explanation: "3/5 = 6/10 = 60%.",
    },
    BankQuestion {
        topic: Topic::Number,
        prompt: "Calculate: 2.4 × 0.5",
        options: ["1.2", "12", "4.8", "0.12"],
        answer: "1.2",
        explanation: "Multiplying by 0.5 is the same as dividing by 2.",
    },
    BankQuestion {
        topic: Topic::Number,
        prompt: "What is 25% of 80?",
        options: ["25", "20", "40", "10"],
        answer: "20",
        explanation: "25% is 1/4. 80 divided by 4 is 20.",
    },
    BankQuestion {
        topic: Topic::Number,
        prompt: "Find the H.C.F (Highest Common Factor) of 12 and 18.",
        options: ["3", "6", "12", "36"],
        answer: "6",
        explanation: "Factors of 12: 1,2,3,4,6,12. Factors of 18: 1,2,3,6,9,18. HCF is 6.",
    },
    BankQuestion {
        topic: Topic::Number,
        prompt: "A tank has 4 Liters. 500 mL is used. How much is left?",
        options: ["3.5 L", "4.5 L", "350 mL", "399.5 L"],
        answer: "3.5 L",
        explanation: "4 L = 4000 mL. 4000 - 500 = 3500 mL = 3.5 L.",
    },
    // Data Handling
    BankQuestion {
        topic: Topic::DataHandling,
        prompt: "Find the average of: 18, 25, 32",
        options: ["20", "25", "75", "30"],
        answer: "25",
        explanation: "(18 + 25 + 32) / 3 = 75 / 3 = 25.",
    },
    BankQuestion {
        topic: Topic::DataHandling,
        prompt: "In a pie chart, what is the sum of all angles at the center?",
        options: ["90°", "180°", "360°", "100°"],
        answer: "360°",
        explanation: "A full circle is 360 degrees.",
    },
    BankQuestion {
        topic: Topic::DataHandling,
        prompt: "The average of 3 numbers is 20. What is their sum?",
        options: ["23", "60", "17", "40"],
        answer: "60",
        explanation: "Sum = Average × Count. 20 × 3 = 60.",
    },
    BankQuestion {
        topic: Topic::DataHandling,
        prompt: "If a bar chart shows 10 units height for 'Apple' and 1 unit = 5 people, how many people chose Apple?",
        options: ["10", "15", "50", "2"],
        answer: "50",
        explanation: "10 units × 5 people/unit = 50 people.",
    },
    BankQuestion {
        topic: Topic::Number,
        prompt: "What is the L.C.M (Lowest Common Multiple) of 4 and 6?",
        options: ["24", "12", "2", "10"],
        answer: "12",
        explanation: "Multiples of 4: 4, 8, 12... Multiples of 6: 6, 12... LCM is 12.",
    },
];

pub fn questions() -> &'static [BankQuestion] {
    &QUESTION_BANK
}

/// Shuffles the whole bank and keeps the first [`QUIZ_LENGTH`] entries.
pub fn daily_selection(rng: &mut dyn RngCore) -> Vec<Question> {
    let mut all: Vec<&BankQuestion> = QUESTION_BANK.iter().collect();
    all.shuffle(rng);
    all.into_iter()
        .take(QUIZ_LENGTH)
        .map(BankQuestion::to_question)
        .collect()
}

/// Every bank question for `topic` when there are at most [`QUIZ_LENGTH`],
/// otherwise a random sample of that size.
pub fn topic_selection(topic: Topic, rng: &mut dyn RngCore) -> Vec<Question> {
    let matching: Vec<&BankQuestion> = QUESTION_BANK.iter().filter(|q| q.topic == topic).collect();

    if matching.len() <= QUIZ_LENGTH {
        return matching.into_iter().map(BankQuestion::to_question).collect();
    }

    matching
        .choose_multiple(rng, QUIZ_LENGTH)
        .map(|q| q.to_question())
        .collect()
}
