//! Flat traversal over every coefficient of a decoded scan.
//!
//! Order is MCU first, then component within the MCU, then sample within
//! the component. Capacity, embedding and extraction all walk this order.

use crate::jpeg::scan::Mcu;

/// Forward cursor that can overwrite the coefficient it last returned.
pub struct CoefficientCursor<'a> {
    mcus: &'a mut [Mcu],
    mcu: usize,
    component: usize,
    sample: usize,
    last: Option<(usize, usize, usize)>,
}

impl<'a> CoefficientCursor<'a> {
    pub fn new(mcus: &'a mut [Mcu]) -> Self {
        let mut cursor = CoefficientCursor {
            mcus,
            mcu: 0,
            component: 0,
            sample: 0,
            last: None,
        };
        cursor.settle();
        cursor
    }

    /// Moves past exhausted components and MCUs.
    fn settle(&mut self) {
        while let Some(mcu) = self.mcus.get(self.mcu) {
            match mcu.components.get(self.component) {
                Some(component) if self.sample < component.samples.len() => return,
                Some(_) => {
                    self.component += 1;
                    self.sample = 0;
                }
                None => {
                    self.mcu += 1;
                    self.component = 0;
                    self.sample = 0;
                }
            }
        }
    }

    pub fn has_next(&self) -> bool {
        self.mcu < self.mcus.len()
    }

    /// Advances and returns the next coefficient, `None` once exhausted.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<i16> {
        if !self.has_next() {
            return None;
        }
        let position = (self.mcu, self.component, self.sample);
        let value = self.mcus[self.mcu].components[self.component].samples[self.sample];
        self.last = Some(position);
        self.sample += 1;
        self.settle();
        Some(value)
    }

    /// Overwrites the coefficient returned by the last call to [`next`](Self::next).
    ///
    /// Does nothing before the first call.
    pub fn set(&mut self, value: i16) {
        if let Some((mcu, component, sample)) = self.last {
            self.mcus[mcu].components[component].samples[sample] = value;
        }
    }
}

/// Read-only view of the cursor order.
pub fn coefficients(mcus: &[Mcu]) -> impl Iterator<Item = i16> + '_ {
    mcus.iter()
        .flat_map(|mcu| mcu.components.iter())
        .flat_map(|component| component.samples.iter().copied())
}
